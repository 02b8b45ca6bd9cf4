pub mod asset_assignment;
pub mod borrowing;
pub mod brand;
pub mod category;
pub mod customer;
pub mod inventory_item;
pub mod product_model;
pub mod sale;
pub mod user;

pub use asset_assignment::Entity as AssetAssignment;
pub use borrowing::Entity as Borrowing;
pub use brand::Entity as Brand;
pub use category::Entity as Category;
pub use customer::Entity as Customer;
pub use inventory_item::Entity as InventoryItem;
pub use product_model::Entity as ProductModel;
pub use sale::Entity as Sale;
pub use user::Entity as User;
