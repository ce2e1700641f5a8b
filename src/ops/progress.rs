use crate::io::kv::{KvStore, StoreError};
use crate::model::progress::ProgressState;

/// Namespace for settings that are not item progress
pub const GENERAL_NAMESPACE: &str = "general";
pub const NAME_KEY: &str = "name";
pub const DEFAULT_PLAYER_NAME: &str = "Farmer";

/// Tri-state progress over the key-value store.
///
/// Keys are (category, item id); values are 0, 1 or 2. The store is the only
/// owner of these values: callers read through it every time.
#[derive(Debug)]
pub struct ProgressStore {
    kv: KvStore,
}

impl ProgressStore {
    pub fn new(kv: KvStore) -> Self {
        ProgressStore { kv }
    }

    pub fn in_memory() -> Self {
        Self::new(KvStore::in_memory())
    }

    pub fn kv(&self) -> &KvStore {
        &self.kv
    }

    /// Current state, `Unknown` when never set or when the stored value is
    /// not a valid state.
    pub fn get(&self, category: &str, item_id: &str) -> ProgressState {
        let raw: u8 = self.kv.read(category, item_id, 0);
        ProgressState::from_value(raw).unwrap_or_else(|| {
            tracing::warn!(
                category,
                item_id,
                raw,
                "stored state out of range; treating as unknown"
            );
            ProgressState::Unknown
        })
    }

    /// Move to the next state, wrapping, and return it.
    pub fn advance(&mut self, category: &str, item_id: &str) -> Result<ProgressState, StoreError> {
        let next = self.get(category, item_id).next();
        self.kv.write(category, item_id, &next.value())?;
        tracing::debug!(category, item_id, state = %next, "advanced");
        Ok(next)
    }

    pub fn set(
        &mut self,
        category: &str,
        item_id: &str,
        state: ProgressState,
    ) -> Result<(), StoreError> {
        self.kv.write(category, item_id, &state.value())?;
        tracing::debug!(category, item_id, %state, "set");
        Ok(())
    }

    /// Forget all progress in a category. Returns how many entries were cleared.
    pub fn reset(&mut self, category: &str) -> Result<usize, StoreError> {
        let removed = self.kv.remove_namespace(category)?;
        tracing::info!(category, removed, "reset progress");
        Ok(removed)
    }

    /// Stored (item id, state) pairs in a category, in write order
    pub fn stored(&self, category: &str) -> Vec<(String, ProgressState)> {
        self.kv
            .entries(category)
            .map(|(key, _)| (key.to_string(), self.get(category, key)))
            .collect()
    }

    pub fn player_name(&self) -> String {
        self.kv
            .read(GENERAL_NAMESPACE, NAME_KEY, DEFAULT_PLAYER_NAME.to_string())
    }

    pub fn set_player_name(&mut self, name: &str) -> Result<(), StoreError> {
        self.kv.write(GENERAL_NAMESPACE, NAME_KEY, &name)
    }
}
