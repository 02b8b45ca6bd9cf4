use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_customers_table::Migration),
            Box::new(m20250101_000003_create_catalog_tables::Migration),
            Box::new(m20250101_000004_create_sales_table::Migration),
            Box::new(m20250101_000005_create_borrowings_table::Migration),
            Box::new(m20250101_000006_create_inventory_items_table::Migration),
            Box::new(m20250101_000007_create_asset_assignments_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250101_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                        .col(ColumnDef::new(Users::Password).string().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(ColumnDef::new(Users::Role).string_len(20).not_null())
                        .col(
                            ColumnDef::new(Users::AccountStatus)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Users {
        Table,
        Id,
        Username,
        Email,
        Password,
        Name,
        Role,
        AccountStatus,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000002_create_customers_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_customers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Customers::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Customers::CustomerCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Customers::Name).string().not_null())
                        .col(ColumnDef::new(Customers::Phone).string())
                        .col(ColumnDef::new(Customers::Email).string())
                        .col(ColumnDef::new(Customers::Address).string())
                        .col(
                            ColumnDef::new(Customers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Customers::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Customers {
        Table,
        Id,
        CustomerCode,
        Name,
        Phone,
        Email,
        Address,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000003_create_catalog_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Categories::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Brands::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Brands::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Brands::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductModels::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductModels::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProductModels::ModelNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(ProductModels::Description).string())
                        .col(ColumnDef::new(ProductModels::SellingPrice).decimal_len(16, 4))
                        .col(ColumnDef::new(ProductModels::CategoryId).integer().not_null())
                        .col(ColumnDef::new(ProductModels::BrandId).integer().not_null())
                        .col(
                            ColumnDef::new(ProductModels::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductModels::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_models_category")
                                .from(ProductModels::Table, ProductModels::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_product_models_brand")
                                .from(ProductModels::Table, ProductModels::BrandId)
                                .to(Brands::Table, Brands::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductModels::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Brands::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Categories {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    pub enum Brands {
        Table,
        Id,
        Name,
    }

    #[derive(DeriveIden)]
    pub enum ProductModels {
        Table,
        Id,
        ModelNumber,
        Description,
        SellingPrice,
        CategoryId,
        BrandId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250101_000004_create_sales_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_sales_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Sales::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Sales::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Sales::CustomerId).integer().not_null())
                        .col(ColumnDef::new(Sales::SoldById).integer().not_null())
                        .col(ColumnDef::new(Sales::Subtotal).decimal_len(16, 4).not_null())
                        .col(
                            ColumnDef::new(Sales::VatAmount)
                                .decimal_len(16, 4)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Sales::Total).decimal_len(16, 4).not_null())
                        .col(
                            ColumnDef::new(Sales::SaleDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Sales::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Sales {
        Table,
        Id,
        CustomerId,
        SoldById,
        Subtotal,
        VatAmount,
        Total,
        SaleDate,
    }
}

mod m20250101_000005_create_borrowings_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_borrowings_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Borrowings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Borrowings::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Borrowings::BorrowerId).integer().not_null())
                        .col(
                            ColumnDef::new(Borrowings::ApprovedById)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Borrowings::Status).string_len(10).not_null())
                        .col(
                            ColumnDef::new(Borrowings::BorrowDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Borrowings::DueDate).timestamp_with_time_zone())
                        .col(ColumnDef::new(Borrowings::ReturnDate).timestamp_with_time_zone())
                        .col(ColumnDef::new(Borrowings::Notes).string())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Borrowings::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Borrowings {
        Table,
        Id,
        BorrowerId,
        ApprovedById,
        Status,
        BorrowDate,
        DueDate,
        ReturnDate,
        Notes,
    }
}

mod m20250101_000006_create_inventory_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000006_create_inventory_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(InventoryItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(InventoryItems::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ItemType)
                                .string_len(10)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::Status)
                                .string_len(20)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::SerialNumber)
                                .string()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::MacAddress)
                                .string()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::AssetCode)
                                .string()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::ProductModelId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::AddedById)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(InventoryItems::SaleId).integer())
                        .col(ColumnDef::new(InventoryItems::BorrowingId).integer())
                        .col(ColumnDef::new(InventoryItems::AssignedToId).integer())
                        .col(
                            ColumnDef::new(InventoryItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(InventoryItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_items_sale")
                                .from(InventoryItems::Table, InventoryItems::SaleId)
                                .to(Sales::Table, Sales::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_inventory_items_borrowing")
                                .from(InventoryItems::Table, InventoryItems::BorrowingId)
                                .to(Borrowings::Table, Borrowings::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_inventory_items_status")
                        .table(InventoryItems::Table)
                        .col(InventoryItems::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(InventoryItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum InventoryItems {
        Table,
        Id,
        ItemType,
        Status,
        SerialNumber,
        MacAddress,
        AssetCode,
        ProductModelId,
        AddedById,
        SaleId,
        BorrowingId,
        AssignedToId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Sales {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Borrowings {
        Table,
        Id,
    }
}

mod m20250101_000007_create_asset_assignments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000007_create_asset_assignments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(AssetAssignments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(AssetAssignments::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(AssetAssignments::ItemId).integer().not_null())
                        .col(
                            ColumnDef::new(AssetAssignments::AssigneeId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssetAssignments::ApprovedById)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssetAssignments::AssignedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(AssetAssignments::ReturnedAt)
                                .timestamp_with_time_zone(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_asset_assignments_item")
                                .from(AssetAssignments::Table, AssetAssignments::ItemId)
                                .to(InventoryItems::Table, InventoryItems::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_asset_assignments_item")
                        .table(AssetAssignments::Table)
                        .col(AssetAssignments::ItemId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(AssetAssignments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum AssetAssignments {
        Table,
        Id,
        ItemId,
        AssigneeId,
        ApprovedById,
        AssignedAt,
        ReturnedAt,
    }

    #[derive(DeriveIden)]
    enum InventoryItems {
        Table,
        Id,
    }
}
