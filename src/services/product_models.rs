use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    brand, category, inventory_item, product_model, Brand, Category, InventoryItem, ProductModel,
};
use crate::errors::ServiceError;
use crate::handlers::common::{ListQuery, PaginatedResponse};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductModelRequest {
    #[validate(length(min = 1, message = "Model number is required"))]
    pub model_number: String,
    pub description: Option<String>,
    pub selling_price: Option<Decimal>,
    pub category_id: i32,
    pub brand_id: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductModelResponse {
    #[serde(flatten)]
    pub model: product_model::Model,
    pub category: Option<category::Model>,
    pub brand: Option<brand::Model>,
}

/// Catalog administration. Product models carry the selling price used by
/// sale totals; inventory items reference them, so deletion is blocked
/// while any item still does.
#[derive(Clone)]
pub struct ProductModelService {
    db: Arc<DbPool>,
}

impl ProductModelService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(model_number = %request.model_number))]
    pub async fn create_product_model(
        &self,
        request: CreateProductModelRequest,
    ) -> Result<product_model::Model, ServiceError> {
        request.validate()?;

        Category::find_by_id(request.category_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Category".to_string()))?;
        Brand::find_by_id(request.brand_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Brand".to_string()))?;

        let created = product_model::ActiveModel {
            model_number: Set(request.model_number),
            description: Set(request.description),
            selling_price: Set(request.selling_price),
            category_id: Set(request.category_id),
            brand_id: Set(request.brand_id),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| ServiceError::classify_unique(e, &["model_number"]))?;

        info!(product_model_id = created.id, "product model created");
        Ok(created)
    }

    pub async fn get_product_model(
        &self,
        model_id: i32,
    ) -> Result<ProductModelResponse, ServiceError> {
        let model = ProductModel::find_by_id(model_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product model".to_string()))?;

        let mut hydrated = self.attach_refs(vec![model]).await?;
        // attach_refs preserves its input length
        hydrated
            .pop()
            .ok_or_else(|| ServiceError::Internal("product model hydration lost a row".to_string()))
    }

    #[instrument(skip(self, request), fields(model_id))]
    pub async fn update_product_model(
        &self,
        model_id: i32,
        request: CreateProductModelRequest,
    ) -> Result<product_model::Model, ServiceError> {
        request.validate()?;

        let existing = ProductModel::find_by_id(model_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product model".to_string()))?;

        Category::find_by_id(request.category_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Category".to_string()))?;
        Brand::find_by_id(request.brand_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Brand".to_string()))?;

        let mut updated: product_model::ActiveModel = existing.into();
        updated.model_number = Set(request.model_number);
        updated.description = Set(request.description);
        updated.selling_price = Set(request.selling_price);
        updated.category_id = Set(request.category_id);
        updated.brand_id = Set(request.brand_id);
        updated.updated_at = Set(Utc::now());

        updated
            .update(&*self.db)
            .await
            .map_err(|e| ServiceError::classify_unique(e, &["model_number"]))
    }

    /// Deletes a product model unless inventory items still reference it.
    #[instrument(skip(self), fields(model_id))]
    pub async fn delete_product_model(&self, model_id: i32) -> Result<(), ServiceError> {
        let existing = ProductModel::find_by_id(model_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Product model".to_string()))?;

        let referencing = InventoryItem::find()
            .filter(inventory_item::Column::ProductModelId.eq(model_id))
            .count(&*self.db)
            .await?;
        if referencing > 0 {
            return Err(ServiceError::State(format!(
                "Product model {} is referenced by {} inventory item(s) and cannot be deleted",
                model_id, referencing
            )));
        }

        existing.delete(&*self.db).await?;
        info!(model_id, "product model deleted");
        Ok(())
    }

    /// Full catalog, model number order, for pickers.
    pub async fn list_all(&self) -> Result<Vec<ProductModelResponse>, ServiceError> {
        let models = ProductModel::find()
            .order_by_asc(product_model::Column::ModelNumber)
            .all(&*self.db)
            .await?;
        self.attach_refs(models).await
    }

    /// Paginated catalog listing, newest first, searching model number and
    /// description.
    pub async fn list_product_models(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<ProductModelResponse>, ServiceError> {
        let mut finder = ProductModel::find().order_by_desc(product_model::Column::CreatedAt);
        if let Some(term) = query.search_term() {
            finder = finder.filter(
                Condition::any()
                    .add(product_model::Column::ModelNumber.contains(term))
                    .add(product_model::Column::Description.contains(term)),
            );
        }

        let paginator = finder.paginate(&*self.db, query.per_page());
        let total_items = paginator.num_items().await?;
        let models = paginator.fetch_page(query.page.saturating_sub(1)).await?;

        let data = self.attach_refs(models).await?;
        Ok(PaginatedResponse::new(data, &query, total_items))
    }

    /// Joins category and brand rows onto a batch of models with two
    /// lookups instead of one pair per row.
    async fn attach_refs(
        &self,
        models: Vec<product_model::Model>,
    ) -> Result<Vec<ProductModelResponse>, ServiceError> {
        let category_ids: Vec<i32> = models.iter().map(|m| m.category_id).collect();
        let brand_ids: Vec<i32> = models.iter().map(|m| m.brand_id).collect();

        let categories: HashMap<i32, category::Model> = Category::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let brands: HashMap<i32, brand::Model> = Brand::find()
            .filter(brand::Column::Id.is_in(brand_ids))
            .all(&*self.db)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        Ok(models
            .into_iter()
            .map(|model| ProductModelResponse {
                category: categories.get(&model.category_id).cloned(),
                brand: brands.get(&model.brand_id).cloned(),
                model,
            })
            .collect())
    }
}
