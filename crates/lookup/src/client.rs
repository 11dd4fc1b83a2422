use crate::config::DatasetConfig;
use crate::dataset::{
    CatalogMismatch, Dataset, FoodKeyed, find_record, parse_nutrition, parse_recipes,
    verify_catalog,
};
use crate::error::LookupError;
use common::{Location, RetryPolicy, fetch_text, retry_with_backoff, span};
use reqwest::Client;
use schema::{LabelCatalog, NutritionRecord, RecipeRecord};

/// Fetches the recipe and nutrition tables and resolves dish names against
/// them. Tables are fetched fresh on every call.
#[derive(Clone)]
pub struct LookupClient {
    client: Client,
    recipe: Location,
    nutrition: Location,
    retry: RetryPolicy,
}

impl LookupClient {
    pub fn new(client: Client, config: &DatasetConfig, retry: RetryPolicy) -> Self {
        Self {
            client,
            recipe: Location::parse(&config.recipe_url),
            nutrition: Location::parse(&config.nutrition_url),
            retry,
        }
    }

    async fn fetch_dataset(&self, dataset: Dataset) -> Result<String, LookupError> {
        let location = match dataset {
            Dataset::Recipe => &self.recipe,
            Dataset::Nutrition => &self.nutrition,
        };

        retry_with_backoff(
            move || async move {
                fetch_text(&self.client, location)
                    .await
                    .map_err(|e| LookupError::fetch(dataset, e))
            },
            &self.retry,
            &format!("{} dataset download", dataset),
            LookupError::is_transient,
        )
        .await
    }

    pub async fn fetch_recipes(&self) -> Result<Vec<RecipeRecord>, LookupError> {
        let text = self.fetch_dataset(Dataset::Recipe).await?;
        let _s = span!("parse_recipes");
        parse_recipes(&text).map_err(|e| LookupError::parse(Dataset::Recipe, e))
    }

    pub async fn fetch_nutrition(&self) -> Result<Vec<NutritionRecord>, LookupError> {
        let text = self.fetch_dataset(Dataset::Nutrition).await?;
        let _s = span!("parse_nutrition");
        parse_nutrition(&text).map_err(|e| LookupError::parse(Dataset::Nutrition, e))
    }

    /// Ingredient and step text for the predicted label.
    pub async fn get_recipe(
        &self,
        label_index: usize,
        catalog: &LabelCatalog,
    ) -> Result<(String, String), LookupError> {
        let food_name = label(label_index, catalog)?;
        let recipes = self.fetch_recipes().await?;
        let record = matching(&recipes, food_name, Dataset::Recipe)?;

        Ok((record.ingredient.clone(), record.step.clone()))
    }

    /// Full nutrition row for the predicted label.
    pub async fn get_nutrition(
        &self,
        label_index: usize,
        catalog: &LabelCatalog,
    ) -> Result<NutritionRecord, LookupError> {
        let food_name = label(label_index, catalog)?;
        let rows = self.fetch_nutrition().await?;

        matching(&rows, food_name, Dataset::Nutrition).cloned()
    }

    /// Every catalog label that does not resolve to exactly one row, across
    /// both tables. Empty means the catalog and datasets agree.
    pub async fn verify_catalog(
        &self,
        catalog: &LabelCatalog,
    ) -> Result<Vec<CatalogMismatch>, LookupError> {
        let (recipes, nutrition) = tokio::try_join!(self.fetch_recipes(), self.fetch_nutrition())?;

        let mut mismatches = verify_catalog(&recipes, catalog, Dataset::Recipe);
        mismatches.extend(verify_catalog(&nutrition, catalog, Dataset::Nutrition));

        for mismatch in &mismatches {
            tracing::warn!(
                dataset = %mismatch.dataset,
                label = %mismatch.label,
                matches = mismatch.matches,
                "Catalog label does not resolve to exactly one row"
            );
        }

        Ok(mismatches)
    }
}

fn label(index: usize, catalog: &LabelCatalog) -> Result<&str, LookupError> {
    catalog.name(index).ok_or(LookupError::UnknownLabel {
        index,
        len: catalog.len(),
    })
}

fn matching<'a, R: FoodKeyed>(
    records: &'a [R],
    food_name: &str,
    dataset: Dataset,
) -> Result<&'a R, LookupError> {
    find_record(records, food_name).ok_or_else(|| {
        tracing::error!(
            dataset = %dataset,
            food_name,
            rows = records.len(),
            "Predicted dish missing from dataset"
        );
        LookupError::RecordNotFound {
            dataset,
            food_name: food_name.to_string(),
        }
    })
}
