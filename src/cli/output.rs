use serde::Serialize;

use crate::model::catalog::Category;
use crate::model::progress::ProgressState;
use crate::ops::filter::ItemView;
use crate::ops::stats::{AchievementStatus, CategoryStats, GroupStats, StateCounts};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct ItemJson {
    pub category: String,
    pub group: String,
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub state: ProgressState,
    pub value: u8,
    pub label: String,
}

#[derive(Serialize)]
pub struct ItemListJson {
    pub category: String,
    pub items: Vec<ItemJson>,
}

#[derive(Serialize)]
pub struct CategoryJson {
    pub id: String,
    pub name: String,
    pub total: usize,
    pub complete: usize,
    pub percent: u8,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub player: String,
    pub categories: Vec<CategoryStatsJson>,
}

#[derive(Serialize)]
pub struct CategoryStatsJson {
    #[serde(flatten)]
    pub stats: CategoryStats,
    pub total: usize,
    pub percent: u8,
    pub summary: String,
}

#[derive(Serialize)]
pub struct ResetJson {
    pub category: String,
    pub removed: usize,
}

#[derive(Serialize)]
pub struct NameJson {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn item_to_json(category: &Category, view: &ItemView, with_description: bool) -> ItemJson {
    ItemJson {
        category: category.id.clone(),
        group: view.group.id.clone(),
        id: view.item.id.clone(),
        name: view.item.name.clone(),
        description: if with_description && !view.item.description.is_empty() {
            Some(view.item.description.clone())
        } else {
            None
        },
        state: view.state,
        value: view.state.value(),
        label: category.state_label(view.state).to_string(),
    }
}

pub fn category_to_json(stats: &CategoryStats) -> CategoryJson {
    CategoryJson {
        id: stats.id.clone(),
        name: stats.name.clone(),
        total: stats.total(),
        complete: stats.counts.complete,
        percent: stats.percent_complete(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Checkbox marker for a state: `[ ]`, `[~]`, `[x]`
pub fn state_marker(state: ProgressState) -> &'static str {
    match state {
        ProgressState::Unknown => "[ ]",
        ProgressState::InProgress => "[~]",
        ProgressState::Complete => "[x]",
    }
}

/// `[x] 96   Dwarf Scroll I  (donated)`
pub fn format_item_line(category: &Category, view: &ItemView, id_width: usize) -> String {
    let mut line = format!(
        "{} {:<width$} {}",
        state_marker(view.state),
        view.item.id,
        view.item.name,
        width = id_width
    );
    if view.state != ProgressState::Unknown {
        line.push_str(&format!("  ({})", category.state_label(view.state).to_lowercase()));
    }
    line
}

/// Multi-line detail block for `dew show`
pub fn format_item_detail(category: &Category, view: &ItemView) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} {}\n", state_marker(view.state), view.item.name));
    out.push_str(&format!("id: {}\n", view.item.id));
    out.push_str(&format!("category: {}\n", category.name));
    out.push_str(&format!("group: {}\n", view.group.name));
    out.push_str(&format!(
        "state: {} ({})\n",
        category.state_label(view.state),
        view.state.value()
    ));
    if !view.item.description.is_empty() {
        out.push_str(&format!("\n{}\n", view.item.description));
    }
    out
}

fn format_counts(category: &Category, counts: &StateCounts) -> String {
    ProgressState::ALL
        .iter()
        .rev()
        .map(|s| format!("{} {}", counts.get(*s), category.state_label(*s).to_lowercase()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_group_line(category: &Category, group: &GroupStats) -> String {
    format!(
        "  {:<12} {:>3}/{:<3} {}",
        group.name,
        group.counts.complete,
        group.total(),
        format_counts(category, &group.counts)
    )
}

/// Stats block for one category
pub fn format_stats(category: &Category, stats: &CategoryStats, summary: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}  {}% ({}/{})\n",
        stats.name,
        stats.percent_complete(),
        stats.counts.complete,
        stats.total()
    ));
    out.push_str(&format!("  {}\n", summary));
    for group in &stats.groups {
        out.push_str(&format_group_line(category, group));
        out.push('\n');
    }
    out
}

/// `[x] Treasure Trove  40/40  Donate 40 different items to the museum.`
pub fn format_achievement_line(a: &AchievementStatus) -> String {
    format!(
        "{} {}  {}/{}  {}",
        if a.earned { "[x]" } else { "[ ]" },
        a.name,
        a.progress,
        a.target,
        a.description
    )
}
