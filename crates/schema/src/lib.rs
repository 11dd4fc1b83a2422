pub mod catalog;
pub mod records;

pub use catalog::{CatalogEntry, INDONESIAN_DISHES, LabelCatalog, title_case};
pub use records::{FoodReport, NutritionRecord, Prediction, RecipeRecord};
