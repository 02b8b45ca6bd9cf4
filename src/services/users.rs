use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::{hash_password, verify_password};
use crate::db::DbPool;
use crate::entities::user::{self, AccountStatus, UserRole};
use crate::entities::User;
use crate::errors::ServiceError;
use crate::handlers::common::{ListQuery, PaginatedResponse};

const UNIQUE_USER_FIELDS: &[&str] = &["username", "email"];

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub account_status: AccountStatus,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

/// User administration and self-service.
#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    pub async fn list_users(
        &self,
        query: ListQuery,
    ) -> Result<PaginatedResponse<user::Model>, ServiceError> {
        let mut finder = User::find().order_by_desc(user::Column::CreatedAt);
        if let Some(term) = query.search_term() {
            finder = finder.filter(
                Condition::any()
                    .add(user::Column::Name.contains(term))
                    .add(user::Column::Email.contains(term)),
            );
        }

        let paginator = finder.paginate(&*self.db, query.per_page());
        let total_items = paginator.num_items().await?;
        let data = paginator.fetch_page(query.page.saturating_sub(1)).await?;

        Ok(PaginatedResponse::new(data, &query, total_items))
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create_user(
        &self,
        request: CreateUserRequest,
    ) -> Result<user::Model, ServiceError> {
        request.validate()?;

        let created = user::ActiveModel {
            username: Set(request.username),
            email: Set(request.email),
            password: Set(hash_password(&request.password)?),
            name: Set(request.name),
            role: Set(request.role),
            account_status: Set(AccountStatus::Active),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| ServiceError::classify_unique(e, UNIQUE_USER_FIELDS))?;

        info!(user_id = created.id, "user created");
        Ok(created)
    }

    pub async fn update_user(
        &self,
        user_id: i32,
        request: UpdateUserRequest,
    ) -> Result<user::Model, ServiceError> {
        request.validate()?;

        let existing = self.find_user(user_id).await?;

        let mut updated: user::ActiveModel = existing.into();
        updated.username = Set(request.username);
        updated.email = Set(request.email);
        updated.name = Set(request.name);
        updated.role = Set(request.role);
        updated.updated_at = Set(Utc::now());

        updated
            .update(&*self.db)
            .await
            .map_err(|e| ServiceError::classify_unique(e, UNIQUE_USER_FIELDS))
    }

    pub async fn update_status(
        &self,
        user_id: i32,
        request: UpdateStatusRequest,
    ) -> Result<user::Model, ServiceError> {
        let existing = self.find_user(user_id).await?;

        let mut updated: user::ActiveModel = existing.into();
        updated.account_status = Set(request.account_status);
        updated.updated_at = Set(Utc::now());
        let updated = updated.update(&*self.db).await?;

        info!(user_id, status = ?updated.account_status, "account status updated");
        Ok(updated)
    }

    pub async fn delete_user(&self, user_id: i32) -> Result<(), ServiceError> {
        let existing = self.find_user(user_id).await?;
        existing.delete(&*self.db).await?;
        info!(user_id, "user deleted");
        Ok(())
    }

    pub async fn update_profile(
        &self,
        user_id: i32,
        request: UpdateProfileRequest,
    ) -> Result<user::Model, ServiceError> {
        request.validate()?;

        let existing = self.find_user(user_id).await?;

        let mut updated: user::ActiveModel = existing.into();
        updated.name = Set(request.name);
        updated.username = Set(request.username);
        updated.email = Set(request.email);
        updated.updated_at = Set(Utc::now());

        updated
            .update(&*self.db)
            .await
            .map_err(|e| ServiceError::classify_unique(e, UNIQUE_USER_FIELDS))
    }

    pub async fn change_password(
        &self,
        user_id: i32,
        request: ChangePasswordRequest,
    ) -> Result<(), ServiceError> {
        request.validate()?;

        let existing = self.find_user(user_id).await?;

        if !verify_password(&request.current_password, &existing.password)? {
            return Err(ServiceError::Validation(
                "Invalid current password".to_string(),
            ));
        }

        let mut updated: user::ActiveModel = existing.into();
        updated.password = Set(hash_password(&request.new_password)?);
        updated.updated_at = Set(Utc::now());
        updated.update(&*self.db).await?;

        info!(user_id, "password changed");
        Ok(())
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, ServiceError> {
        let found = User::find()
            .filter(user::Column::Username.eq(username))
            .one(&*self.db)
            .await?;
        Ok(found)
    }

    async fn find_user(&self, user_id: i32) -> Result<user::Model, ServiceError> {
        User::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User".to_string()))
    }
}
