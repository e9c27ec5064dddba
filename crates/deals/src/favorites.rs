//! Favorite deals

use crate::error::DealResult;
use savemate_core::store::{KeyValueStore, KeyValueStoreExt};

/// Store key holding the favorite id list
pub const FAVORITES_KEY: &str = "favorites";

/// Favorite deal ids, in the order they were added
pub struct Favorites<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> Favorites<'a> {
    /// Favorites persisted in `store`
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// All favorite ids
    pub fn list(&self) -> DealResult<Vec<String>> {
        Ok(self.store.get_json(FAVORITES_KEY)?.unwrap_or_default())
    }

    /// Whether `id` is a favorite
    pub fn contains(&self, id: &str) -> DealResult<bool> {
        Ok(self.list()?.iter().any(|f| f == id))
    }

    /// Mark `id` as favorite, returning `false` when it already was
    pub fn add(&self, id: &str) -> DealResult<bool> {
        let mut ids = self.list()?;
        if ids.iter().any(|f| f == id) {
            return Ok(false);
        }
        ids.push(id.to_string());
        self.save(&ids)?;
        Ok(true)
    }

    /// Unmark `id`, returning `false` when it was not a favorite
    pub fn remove(&self, id: &str) -> DealResult<bool> {
        let mut ids = self.list()?;
        let before = ids.len();
        ids.retain(|f| f != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.save(&ids)?;
        Ok(true)
    }

    /// Flip `id`, returning whether it is a favorite afterwards
    pub fn toggle(&self, id: &str) -> DealResult<bool> {
        if self.remove(id)? {
            Ok(false)
        } else {
            self.add(id)
        }
    }

    /// Drop every favorite
    pub fn clear(&self) -> DealResult<()> {
        self.store.remove(FAVORITES_KEY)?;
        Ok(())
    }

    fn save(&self, ids: &[String]) -> DealResult<()> {
        self.store.set_json(FAVORITES_KEY, ids)?;
        Ok(())
    }
}
