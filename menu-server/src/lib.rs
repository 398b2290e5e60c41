//! menu-server: restaurant menu REST backend
//!
//! Catalog (categories, subcategories, items), restaurant info and hours,
//! content sections, image uploads to S3 and dashboard statistics, served
//! over axum with PostgreSQL storage.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

pub use config::Config;
pub use state::AppState;
