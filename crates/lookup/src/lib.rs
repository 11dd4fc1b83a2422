pub mod client;
pub mod config;
pub mod dataset;
pub mod error;

pub use client::LookupClient;
pub use config::{DEFAULT_NUTRITION_URL, DEFAULT_RECIPE_URL, DatasetConfig};
pub use dataset::{
    CatalogMismatch, Dataset, FoodKeyed, find_record, parse_nutrition, parse_recipes,
    verify_catalog,
};
pub use error::LookupError;
