use serde::Deserialize;

pub const DEFAULT_RECIPE_URL: &str =
    "https://raw.githubusercontent.com/DedeUlfah/Food_classifier_streamlit/main/data_resep.csv";
pub const DEFAULT_NUTRITION_URL: &str = "https://raw.githubusercontent.com/DedeUlfah/Food_classifier_streamlit/main/total_nutrition_per_food.csv";

/// Locations of the two lookup tables (HTTP(S) URL or local path).
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub recipe_url: String,
    pub nutrition_url: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            recipe_url: DEFAULT_RECIPE_URL.to_string(),
            nutrition_url: DEFAULT_NUTRITION_URL.to_string(),
        }
    }
}
