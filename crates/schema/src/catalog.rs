use serde::Serialize;

/// Dish names in classifier output order.
///
/// The model was trained against exactly this ordering: position `i` is the
/// dish scored by output `i`. Never reorder without retraining.
pub const INDONESIAN_DISHES: [&str; 23] = [
    "ayam goreng",
    "ayam pop",
    "gulai tambusu",
    "kue ape",
    "kue bika ambon",
    "kue cenil",
    "kue dadar gulung",
    "kue gethuk lidri",
    "kue kastangel",
    "kue klepon",
    "kue lapis",
    "kue lumpur",
    "kue nagasari",
    "kue pastel",
    "kue putri salju",
    "kue risoles",
    "lemper",
    "lumpia",
    "putu ayu",
    "serabi solo",
    "telur balado",
    "telur dadar",
    "wajik",
];

/// Ordered mapping from classifier output positions to dish names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCatalog {
    labels: Vec<String>,
}

/// A catalog entry as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub index: usize,
    pub name: String,
    pub display_name: String,
}

impl LabelCatalog {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// The 23-dish catalog the published food model was trained on.
    pub fn indonesian_dishes() -> Self {
        Self::new(INDONESIAN_DISHES)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Title-cased name for display, e.g. `"Kue Bika Ambon"`.
    pub fn display_name(&self, index: usize) -> Option<String> {
        self.name(index).map(title_case)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().map(String::as_str).enumerate()
    }

    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.iter()
            .map(|(index, name)| CatalogEntry {
                index,
                name: name.to_string(),
                display_name: title_case(name),
            })
            .collect()
    }
}

impl Default for LabelCatalog {
    fn default() -> Self {
        Self::indonesian_dishes()
    }
}

pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_order_is_stable() {
        let catalog = LabelCatalog::indonesian_dishes();

        assert_eq!(catalog.len(), 23);
        assert_eq!(catalog.name(0), Some("ayam goreng"));
        assert_eq!(catalog.name(9), Some("kue klepon"));
        assert_eq!(catalog.name(22), Some("wajik"));
        assert_eq!(catalog.name(23), None);
    }

    #[test]
    fn test_catalog_labels_are_unique() {
        let catalog = LabelCatalog::default();
        let unique: HashSet<&str> = catalog.iter().map(|(_, name)| name).collect();
        assert_eq!(unique.len(), catalog.len(), "Duplicate dish names in catalog");
    }

    #[test]
    fn test_display_name() {
        let catalog = LabelCatalog::default();
        assert_eq!(catalog.display_name(0).as_deref(), Some("Ayam Goreng"));
        assert_eq!(catalog.display_name(4).as_deref(), Some("Kue Bika Ambon"));
        assert_eq!(title_case("TELUR  dadar"), "Telur Dadar");
    }

    #[test]
    fn test_entries() {
        let catalog = LabelCatalog::new(["lemper", "wajik"]);
        let entries = catalog.entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[1].name, "wajik");
        assert_eq!(entries[1].display_name, "Wajik");
    }
}
