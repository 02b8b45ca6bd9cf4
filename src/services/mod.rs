pub mod assets;
pub mod borrowings;
pub mod inventory_items;
pub mod product_models;
pub mod sales;
pub mod transitions;
pub mod users;
