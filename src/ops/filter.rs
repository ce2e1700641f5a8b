use regex::Regex;

use crate::model::catalog::{Category, Item, ItemGroup, LookupError};
use crate::model::progress::ProgressState;
use crate::ops::progress::ProgressStore;

/// Which items to show, by state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFilter {
    #[default]
    All,
    /// Anything not complete
    Incomplete,
    Only(ProgressState),
}

impl StateFilter {
    pub fn matches(self, state: ProgressState) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Incomplete => state != ProgressState::Complete,
            StateFilter::Only(s) => s == state,
        }
    }

    /// Next filter in the TUI's `f` cycle
    pub fn cycle(self) -> Self {
        match self {
            StateFilter::All => StateFilter::Incomplete,
            StateFilter::Incomplete => StateFilter::Only(ProgressState::Unknown),
            StateFilter::Only(ProgressState::Unknown) => {
                StateFilter::Only(ProgressState::InProgress)
            }
            StateFilter::Only(ProgressState::InProgress) => {
                StateFilter::Only(ProgressState::Complete)
            }
            StateFilter::Only(ProgressState::Complete) => StateFilter::All,
        }
    }

    pub fn is_active(self) -> bool {
        self != StateFilter::All
    }

    /// Label using the category's own state names
    pub fn label(self, category: &Category) -> String {
        match self {
            StateFilter::All => "all".to_string(),
            StateFilter::Incomplete => format!("not {}", category.verb),
            StateFilter::Only(s) => category.state_label(s).to_lowercase(),
        }
    }

    /// Parse "all", "incomplete", or any state name the category accepts.
    pub fn parse(s: &str, category: &Category) -> Result<Self, LookupError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StateFilter::All),
            "incomplete" | "missing" | "todo" => Ok(StateFilter::Incomplete),
            _ => category.parse_state(s).map(StateFilter::Only),
        }
    }
}

/// Compile a case-insensitive search pattern. Invalid regex syntax falls
/// back to a literal match.
pub fn search_regex(pattern: &str) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    Regex::new(&format!("(?i){}", pattern))
        .or_else(|_| Regex::new(&format!("(?i){}", regex::escape(pattern))))
        .ok()
}

/// Filter criteria for listing a category
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub filter: StateFilter,
    /// Restrict to one group (id or name)
    pub group: Option<String>,
    pub search: Option<Regex>,
}

/// An item together with its current state
#[derive(Debug, Clone, Copy)]
pub struct ItemView<'a> {
    pub group: &'a ItemGroup,
    pub item: &'a Item,
    pub state: ProgressState,
}

/// Items of a category that match `query`, in catalog order.
pub fn filter_items<'a>(
    category: &'a Category,
    store: &ProgressStore,
    query: &ItemQuery,
) -> Result<Vec<ItemView<'a>>, LookupError> {
    let group_id = match &query.group {
        Some(g) => Some(category.group(g)?.id.as_str()),
        None => None,
    };

    Ok(category
        .items()
        .filter(|(group, _)| group_id.is_none_or(|id| group.id == id))
        .filter(|(_, item)| {
            query
                .search
                .as_ref()
                .is_none_or(|re| re.is_match(&item.name))
        })
        .map(|(group, item)| ItemView {
            group,
            item,
            state: store.get(&category.id, &item.id),
        })
        .filter(|view| query.filter.matches(view.state))
        .collect())
}
