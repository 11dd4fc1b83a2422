use serde::{Deserialize, Serialize};

/// One row of the recipe dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub food_name: String,
    pub ingredient: String,
    pub step: String,
}

/// One row of the nutrition dataset. Quantities are per serving as published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    pub food_name: String,
    pub calories: f64,
    pub carbohydrate: f64,
    pub proteins: f64,
    pub fat: f64,
}

/// Classifier output resolved against the label catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub index: usize,
    pub name: String,
    pub display_name: String,
}

/// Everything shown to the user for one upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoodReport {
    pub dish: Prediction,
    pub ingredient: String,
    pub step: String,
    pub nutrition: NutritionRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_shape() {
        let report = FoodReport {
            dish: Prediction {
                index: 16,
                name: "lemper".to_string(),
                display_name: "Lemper".to_string(),
            },
            ingredient: "beras ketan, ayam suwir".to_string(),
            step: "Kukus ketan".to_string(),
            nutrition: NutritionRecord {
                food_name: "lemper".to_string(),
                calories: 210.5,
                carbohydrate: 32.0,
                proteins: 6.4,
                fat: 5.9,
            },
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dish"]["index"], 16);
        assert_eq!(json["dish"]["display_name"], "Lemper");
        assert_eq!(json["nutrition"]["calories"], 210.5);
        assert_eq!(json["step"], "Kukus ketan");
    }
}
