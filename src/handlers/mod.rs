pub mod assets;
pub mod auth;
pub mod borrowings;
pub mod common;
pub mod health;
pub mod inventory_items;
pub mod product_models;
pub mod sales;
pub mod users;
