use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::progress::ProgressState;

const MUSEUM_JSON: &str = include_str!("../../data/museum.json");
const COOKING_JSON: &str = include_str!("../../data/cooking.json");
const ACHIEVEMENTS_JSON: &str = include_str!("../../data/achievements.json");

/// Error type for catalog loading
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not parse catalog data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate category: {0}")]
    DuplicateCategory(String),
    #[error("duplicate item {item} in category {category}")]
    DuplicateItem { category: String, item: String },
    #[error("achievement {achievement} refers to unknown category {category}")]
    UnknownAchievementCategory {
        achievement: String,
        category: String,
    },
}

/// Error type for looking things up by user-supplied names
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("unknown category: {0} (try `dew categories`)")]
    UnknownCategory(String),
    #[error("no item matching \"{item}\" in {category}")]
    UnknownItem { category: String, item: String },
    #[error("invalid state \"{value}\" for {category} (expected 0-2 or one of: {expected})")]
    InvalidState {
        category: String,
        value: String,
        expected: String,
    },
    #[error("unknown group \"{group}\" in {category}")]
    UnknownGroup { category: String, group: String },
}

/// A single collectible
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A named subset of a category (e.g. artifacts, minerals)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemGroup {
    pub id: String,
    pub name: String,
    pub items: Vec<Item>,
}

/// A class of collectibles tracked under one namespace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Past-tense verb for completion ("donated", "cooked")
    pub verb: String,
    /// Display names for states 0, 1, 2
    pub states: [String; 3],
    pub groups: Vec<ItemGroup>,
}

impl Category {
    pub fn state_label(&self, state: ProgressState) -> &str {
        &self.states[state.index()]
    }

    /// Parse a state from a number, a generic name, or this category's names.
    pub fn parse_state(&self, s: &str) -> Result<ProgressState, LookupError> {
        if let Some(state) = ProgressState::parse(s) {
            return Ok(state);
        }
        let wanted = s.trim();
        ProgressState::ALL
            .into_iter()
            .find(|st| self.state_label(*st).eq_ignore_ascii_case(wanted))
            .ok_or_else(|| LookupError::InvalidState {
                category: self.id.clone(),
                value: s.to_string(),
                expected: self.states.join(", ").to_lowercase(),
            })
    }

    /// All items in display order, with their group
    pub fn items(&self) -> impl Iterator<Item = (&ItemGroup, &Item)> {
        self.groups
            .iter()
            .flat_map(|g| g.items.iter().map(move |item| (g, item)))
    }

    pub fn item_count(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn group(&self, id: &str) -> Result<&ItemGroup, LookupError> {
        self.groups
            .iter()
            .find(|g| g.id.eq_ignore_ascii_case(id) || g.name.eq_ignore_ascii_case(id))
            .ok_or_else(|| LookupError::UnknownGroup {
                category: self.id.clone(),
                group: id.to_string(),
            })
    }

    /// Find an item by id, or by case-insensitive exact name.
    pub fn find_item(&self, query: &str) -> Result<(&ItemGroup, &Item), LookupError> {
        let q = query.trim();
        self.items()
            .find(|(_, item)| item.id == q)
            .or_else(|| self.items().find(|(_, item)| item.name.eq_ignore_ascii_case(q)))
            .ok_or_else(|| LookupError::UnknownItem {
                category: self.id.clone(),
                item: query.to_string(),
            })
    }
}

/// What it takes to earn an achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// At least this many complete items in the category
    AtLeast(usize),
    /// Every item in the category complete
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub requirement: Requirement,
}

/// Static lookup tables for every tracked category
#[derive(Debug, Clone)]
pub struct Catalog {
    pub categories: IndexMap<String, Category>,
    pub achievements: Vec<Achievement>,
}

impl Catalog {
    /// The catalog compiled into the binary
    pub fn builtin() -> Result<Catalog, CatalogError> {
        Catalog::from_json(&[MUSEUM_JSON, COOKING_JSON], ACHIEVEMENTS_JSON)
    }

    pub fn from_json(categories: &[&str], achievements: &str) -> Result<Catalog, CatalogError> {
        let mut map = IndexMap::new();
        for text in categories {
            let category: Category = serde_json::from_str(text)?;
            let mut seen = HashSet::new();
            for (_, item) in category.items() {
                if !seen.insert(item.id.as_str()) {
                    return Err(CatalogError::DuplicateItem {
                        category: category.id.clone(),
                        item: item.id.clone(),
                    });
                }
            }
            if map.contains_key(&category.id) {
                return Err(CatalogError::DuplicateCategory(category.id));
            }
            map.insert(category.id.clone(), category);
        }

        let achievements: Vec<Achievement> = serde_json::from_str(achievements)?;
        for a in &achievements {
            if !map.contains_key(&a.category) {
                return Err(CatalogError::UnknownAchievementCategory {
                    achievement: a.id.clone(),
                    category: a.category.clone(),
                });
            }
        }

        Ok(Catalog {
            categories: map,
            achievements,
        })
    }

    pub fn category(&self, id: &str) -> Result<&Category, LookupError> {
        self.categories
            .get(id)
            .or_else(|| {
                self.categories
                    .values()
                    .find(|c| c.name.eq_ignore_ascii_case(id))
            })
            .ok_or_else(|| LookupError::UnknownCategory(id.to_string()))
    }

    /// Achievements belonging to one category
    pub fn achievements_for<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Achievement> {
        self.achievements
            .iter()
            .filter(move |a| a.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn builtin_catalog_loads() {
        let catalog = builtin();
        let ids: Vec<&str> = catalog.categories.keys().map(|s| s.as_str()).collect();
        assert_eq!(ids, vec!["museum", "cooking"]);
    }

    #[test]
    fn museum_has_42_artifacts_and_53_minerals() {
        let catalog = builtin();
        let museum = catalog.category("museum").unwrap();
        assert_eq!(museum.group("artifacts").unwrap().items.len(), 42);
        assert_eq!(museum.group("minerals").unwrap().items.len(), 53);
        assert_eq!(museum.item_count(), 95);
    }

    #[test]
    fn find_item_by_id_or_name() {
        let catalog = builtin();
        let museum = catalog.category("museum").unwrap();
        let (group, item) = museum.find_item("96").unwrap();
        assert_eq!(item.name, "Dwarf Scroll I");
        assert_eq!(group.id, "artifacts");

        let (_, item) = museum.find_item("prismatic shard").unwrap();
        assert_eq!(item.id, "74");

        assert!(matches!(
            museum.find_item("nope"),
            Err(LookupError::UnknownItem { .. })
        ));
    }

    #[test]
    fn category_lookup_by_name() {
        let catalog = builtin();
        assert_eq!(catalog.category("Cooking").unwrap().id, "cooking");
        assert!(matches!(
            catalog.category("fishing"),
            Err(LookupError::UnknownCategory(_))
        ));
    }

    #[test]
    fn parse_category_state_names() {
        let catalog = builtin();
        let museum = catalog.category("museum").unwrap();
        assert_eq!(museum.parse_state("donated").unwrap(), ProgressState::Complete);
        assert_eq!(museum.parse_state("Found").unwrap(), ProgressState::InProgress);
        assert_eq!(museum.parse_state("2").unwrap(), ProgressState::Complete);
        assert!(museum.parse_state("eaten").is_err());
    }

    #[test]
    fn duplicate_items_rejected() {
        let cat = r#"{"id":"x","name":"X","verb":"done","states":["a","b","c"],
            "groups":[{"id":"g","name":"G","items":[
                {"id":"1","name":"One"},{"id":"1","name":"Again"}]}]}"#;
        let err = Catalog::from_json(&[cat], "[]").unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateItem { .. }));
    }

    #[test]
    fn achievement_must_name_known_category() {
        let cat = r#"{"id":"x","name":"X","verb":"done","states":["a","b","c"],"groups":[]}"#;
        let ach = r#"[{"id":"a","name":"A","description":"","category":"y","requirement":"all"}]"#;
        let err = Catalog::from_json(&[cat], ach).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownAchievementCategory { .. }));
    }

    #[test]
    fn requirement_serde_shapes() {
        let r: Requirement = serde_json::from_str(r#"{"at_least":40}"#).unwrap();
        assert_eq!(r, Requirement::AtLeast(40));
        let r: Requirement = serde_json::from_str(r#""all""#).unwrap();
        assert_eq!(r, Requirement::All);
    }

    #[test]
    fn every_category_has_achievements() {
        let catalog = builtin();
        for id in catalog.categories.keys() {
            assert!(catalog.achievements_for(id).count() > 0, "{id}");
        }
    }
}
