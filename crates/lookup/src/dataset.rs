use schema::{LabelCatalog, NutritionRecord, RecipeRecord};
use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Recipe,
    Nutrition,
}

impl Dataset {
    pub fn delimiter(&self) -> u8 {
        match self {
            Dataset::Recipe => b';',
            Dataset::Nutrition => b',',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Recipe => "recipe",
            Dataset::Nutrition => "nutrition",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rows keyed by dish name.
pub trait FoodKeyed {
    fn food_name(&self) -> &str;
}

impl FoodKeyed for RecipeRecord {
    fn food_name(&self) -> &str {
        &self.food_name
    }
}

impl FoodKeyed for NutritionRecord {
    fn food_name(&self) -> &str {
        &self.food_name
    }
}

fn parse<T: DeserializeOwned>(text: &str, dataset: Dataset) -> Result<Vec<T>, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(dataset.delimiter())
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    reader.deserialize().collect()
}

/// Parse the semicolon-delimited recipe table. Extra columns are ignored.
pub fn parse_recipes(text: &str) -> Result<Vec<RecipeRecord>, csv::Error> {
    parse(text, Dataset::Recipe)
}

/// Parse the comma-delimited nutrition table. Extra columns are ignored.
pub fn parse_nutrition(text: &str) -> Result<Vec<NutritionRecord>, csv::Error> {
    parse(text, Dataset::Nutrition)
}

fn matches_name(record: &impl FoodKeyed, folded: &str) -> bool {
    record.food_name().to_lowercase() == folded
}

/// First record whose `food_name` equals `food_name`, ignoring case.
pub fn find_record<'a, R: FoodKeyed>(records: &'a [R], food_name: &str) -> Option<&'a R> {
    let folded = food_name.trim().to_lowercase();
    records.iter().find(|r| matches_name(*r, &folded))
}

/// A catalog label that does not resolve to exactly one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogMismatch {
    pub dataset: Dataset,
    pub label: String,
    pub matches: usize,
}

/// Check that every catalog label matches exactly one row of `records`.
pub fn verify_catalog<R: FoodKeyed>(
    records: &[R],
    catalog: &LabelCatalog,
    dataset: Dataset,
) -> Vec<CatalogMismatch> {
    catalog
        .iter()
        .filter_map(|(_, label)| {
            let folded = label.to_lowercase();
            let matches = records.iter().filter(|r| matches_name(*r, &folded)).count();
            (matches != 1).then(|| CatalogMismatch {
                dataset,
                label: label.to_string(),
                matches,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPES: &str = "\
food_name;ingredient;step
Ayam Goreng;1 ekor ayam, 3 siung bawang putih, garam;\"1. Ungkep ayam.
2. Goreng hingga kecokelatan.\"
lemper;beras ketan, ayam suwir, daun pisang;Kukus ketan lalu isi dengan ayam
";

    const NUTRITION: &str = "\
food_name,calories,carbohydrate,proteins,fat,source
ayam goreng,260,0.0,27.5,16.2,tkpi
Lemper,180.5,30.1,5.2,4.0,tkpi
";

    #[test]
    fn test_parse_recipes_with_multiline_steps() {
        let recipes = parse_recipes(RECIPES).unwrap();

        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].food_name, "Ayam Goreng");
        assert_eq!(
            recipes[0].step,
            "1. Ungkep ayam.\n2. Goreng hingga kecokelatan."
        );
        assert_eq!(recipes[1].ingredient, "beras ketan, ayam suwir, daun pisang");
    }

    #[test]
    fn test_parse_nutrition_ignores_extra_columns() {
        let rows = parse_nutrition(NUTRITION).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].food_name, "Lemper");
        assert_eq!(rows[1].calories, 180.5);
        assert_eq!(rows[0].proteins, 27.5);
    }

    #[test]
    fn test_parse_nutrition_rejects_non_numeric_values() {
        let text = "food_name,calories,carbohydrate,proteins,fat\nwajik,banyak,1,2,3\n";
        assert!(parse_nutrition(text).is_err());
    }

    #[test]
    fn test_parse_recipes_missing_column() {
        let text = "food_name;ingredient\nwajik;ketan\n";
        assert!(parse_recipes(text).is_err(), "Missing `step` column is a schema break");
    }

    #[test]
    fn test_find_record_is_case_insensitive() {
        let recipes = parse_recipes(RECIPES).unwrap();

        for name in ["Ayam Goreng", "ayam goreng", "AYAM GORENG"] {
            let record = find_record(&recipes, name).unwrap();
            assert_eq!(record.food_name, "Ayam Goreng", "lookup of {:?}", name);
        }
        assert!(find_record(&recipes, "ayam pop").is_none());
    }

    #[test]
    fn test_find_record_returns_first_match() {
        let text = "food_name,calories,carbohydrate,proteins,fat\nwajik,1,1,1,1\nWAJIK,2,2,2,2\n";
        let rows = parse_nutrition(text).unwrap();

        assert_eq!(find_record(&rows, "wajik").unwrap().calories, 1.0);
    }

    #[test]
    fn test_verify_catalog_reports_missing_and_duplicate_rows() {
        let catalog = LabelCatalog::new(["ayam goreng", "lemper", "wajik"]);
        let text = "food_name,calories,carbohydrate,proteins,fat\n\
                    ayam goreng,1,1,1,1\nlemper,1,1,1,1\nLEMPER,2,2,2,2\n";
        let rows = parse_nutrition(text).unwrap();

        let mismatches = verify_catalog(&rows, &catalog, Dataset::Nutrition);

        assert_eq!(
            mismatches,
            vec![
                CatalogMismatch {
                    dataset: Dataset::Nutrition,
                    label: "lemper".to_string(),
                    matches: 2,
                },
                CatalogMismatch {
                    dataset: Dataset::Nutrition,
                    label: "wajik".to_string(),
                    matches: 0,
                },
            ]
        );
    }
}
