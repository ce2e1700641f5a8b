use serde::Serialize;

use crate::model::catalog::{Achievement, Catalog, Category, Requirement};
use crate::model::progress::ProgressState;
use crate::ops::progress::ProgressStore;

/// Item counts per progress state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCounts {
    pub unknown: usize,
    pub in_progress: usize,
    pub complete: usize,
}

impl StateCounts {
    pub fn add(&mut self, state: ProgressState) {
        match state {
            ProgressState::Unknown => self.unknown += 1,
            ProgressState::InProgress => self.in_progress += 1,
            ProgressState::Complete => self.complete += 1,
        }
    }

    pub fn get(&self, state: ProgressState) -> usize {
        match state {
            ProgressState::Unknown => self.unknown,
            ProgressState::InProgress => self.in_progress,
            ProgressState::Complete => self.complete,
        }
    }

    pub fn total(&self) -> usize {
        self.unknown + self.in_progress + self.complete
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupStats {
    pub id: String,
    pub name: String,
    pub counts: StateCounts,
}

impl GroupStats {
    pub fn total(&self) -> usize {
        self.counts.total()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStats {
    pub id: String,
    pub name: String,
    pub verb: String,
    pub counts: StateCounts,
    pub groups: Vec<GroupStats>,
}

impl CategoryStats {
    pub fn total(&self) -> usize {
        self.counts.total()
    }

    pub fn percent_complete(&self) -> u8 {
        percentage(self.counts.complete, self.total())
    }
}

/// Whole percent of `done` out of `total`, rounded down so 100 means
/// everything. Zero total is 0%.
pub fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = done.min(total) * 100 / total;
    pct as u8
}

/// Count every item in a category by its stored state.
pub fn category_stats(category: &Category, store: &ProgressStore) -> CategoryStats {
    let mut counts = StateCounts::default();
    let mut groups = Vec::new();
    for group in &category.groups {
        let mut gc = StateCounts::default();
        for item in &group.items {
            let state = store.get(&category.id, &item.id);
            gc.add(state);
            counts.add(state);
        }
        groups.push(GroupStats {
            id: group.id.clone(),
            name: group.name.clone(),
            counts: gc,
        });
    }
    CategoryStats {
        id: category.id.clone(),
        name: category.name.clone(),
        verb: category.verb.clone(),
        counts,
        groups,
    }
}

/// An achievement and whether the tracked progress earns it
#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub earned: bool,
    pub progress: usize,
    pub target: usize,
}

pub fn achievement_status(achievement: &Achievement, stats: &CategoryStats) -> AchievementStatus {
    let target = match achievement.requirement {
        Requirement::AtLeast(n) => n,
        Requirement::All => stats.total(),
    };
    let progress = stats.counts.complete;
    AchievementStatus {
        id: achievement.id.clone(),
        name: achievement.name.clone(),
        description: achievement.description.clone(),
        category: achievement.category.clone(),
        earned: target > 0 && progress >= target,
        progress: progress.min(target),
        target,
    }
}

/// Evaluate every achievement in the catalog against the store.
pub fn evaluate_achievements(catalog: &Catalog, store: &ProgressStore) -> Vec<AchievementStatus> {
    let mut out = Vec::new();
    for category in catalog.categories.values() {
        let stats = category_stats(category, store);
        for a in catalog.achievements_for(&category.id) {
            out.push(achievement_status(a, &stats));
        }
    }
    out
}

/// "Farmer has donated 3/42 artifacts and 0/53 minerals."
pub fn summary_line(player: &str, stats: &CategoryStats) -> String {
    let parts: Vec<String> = stats
        .groups
        .iter()
        .map(|g| format!("{}/{} {}", g.counts.complete, g.total(), g.name.to_lowercase()))
        .collect();
    let joined = match parts.len() {
        0 => format!("0/0 {}", stats.name.to_lowercase()),
        1 => parts[0].clone(),
        n => format!("{} and {}", parts[..n - 1].join(", "), parts[n - 1]),
    };
    format!("{} has {} {}.", player, stats.verb, joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn setup() -> (Catalog, ProgressStore) {
        (Catalog::builtin().unwrap(), ProgressStore::in_memory())
    }

    fn complete_first(store: &mut ProgressStore, category: &Category, n: usize) {
        for (_, item) in category.items().take(n) {
            store.set(&category.id, &item.id, ProgressState::Complete).unwrap();
        }
    }

    #[test]
    fn percentage_rounds_down() {
        assert_eq!(percentage(0, 95), 0);
        assert_eq!(percentage(94, 95), 98);
        assert_eq!(percentage(95, 95), 100);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 66);
        assert_eq!(percentage(5, 0), 0);
    }

    #[test]
    fn fresh_store_counts_everything_unknown() {
        let (catalog, store) = setup();
        let stats = category_stats(catalog.category("museum").unwrap(), &store);
        assert_eq!(stats.total(), 95);
        assert_eq!(stats.counts.unknown, 95);
        assert_eq!(stats.percent_complete(), 0);
        assert_eq!(stats.groups.len(), 2);
        assert_eq!(stats.groups[0].total(), 42);
        assert_eq!(stats.groups[1].total(), 53);
    }

    #[test]
    fn counts_follow_store() {
        let (catalog, mut store) = setup();
        store.set("museum", "96", ProgressState::Complete).unwrap();
        store.set("museum", "97", ProgressState::InProgress).unwrap();
        store.set("museum", "74", ProgressState::Complete).unwrap();

        let stats = category_stats(catalog.category("museum").unwrap(), &store);
        assert_eq!(
            stats.counts,
            StateCounts {
                unknown: 92,
                in_progress: 1,
                complete: 2
            }
        );
        assert_eq!(stats.groups[0].counts.complete, 1);
        assert_eq!(stats.groups[1].counts.complete, 1);
    }

    #[test]
    fn summary_for_museum() {
        let (catalog, mut store) = setup();
        store.set("museum", "96", ProgressState::Complete).unwrap();
        let stats = category_stats(catalog.category("museum").unwrap(), &store);
        assert_eq!(
            summary_line("Farmer", &stats),
            "Farmer has donated 1/42 artifacts and 0/53 minerals."
        );
    }

    #[test]
    fn summary_for_single_group() {
        let (catalog, store) = setup();
        let stats = category_stats(catalog.category("cooking").unwrap(), &store);
        assert_eq!(summary_line("Sam", &stats), "Sam has cooked 0/80 recipes.");
    }

    #[test]
    fn treasure_trove_at_40() {
        let (catalog, mut store) = setup();
        let museum = catalog.category("museum").unwrap().clone();

        complete_first(&mut store, &museum, 39);
        let earned = |store: &ProgressStore| -> Vec<String> {
            evaluate_achievements(&catalog, store)
                .into_iter()
                .filter(|a| a.earned)
                .map(|a| a.id)
                .collect()
        };
        assert!(earned(&store).is_empty());

        complete_first(&mut store, &museum, 40);
        assert_eq!(earned(&store), vec!["treasure-trove".to_string()]);

        complete_first(&mut store, &museum, 95);
        assert_eq!(
            earned(&store),
            vec!["treasure-trove".to_string(), "a-complete-collection".to_string()]
        );
    }

    #[test]
    fn in_progress_items_do_not_count_toward_achievements() {
        let (catalog, mut store) = setup();
        let cooking = catalog.category("cooking").unwrap().clone();
        for (_, item) in cooking.items().take(10) {
            store.set("cooking", &item.id, ProgressState::InProgress).unwrap();
        }
        let statuses = evaluate_achievements(&catalog, &store);
        let cook = statuses.iter().find(|a| a.id == "cook").unwrap();
        assert!(!cook.earned);
        assert_eq!(cook.progress, 0);
        assert_eq!(cook.target, 10);
    }

    #[test]
    fn progress_is_capped_at_target() {
        let (catalog, mut store) = setup();
        let cooking = catalog.category("cooking").unwrap().clone();
        complete_first(&mut store, &cooking, 12);
        let statuses = evaluate_achievements(&catalog, &store);
        let cook = statuses.iter().find(|a| a.id == "cook").unwrap();
        assert!(cook.earned);
        assert_eq!(cook.progress, 10);
        let gourmet = statuses.iter().find(|a| a.id == "gourmet-chef").unwrap();
        assert_eq!((gourmet.progress, gourmet.target), (12, 80));
    }
}
