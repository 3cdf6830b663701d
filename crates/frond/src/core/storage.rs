//! Persistent key-value storage and the recently-viewed product list.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A string key-value store with `localStorage` semantics: whole values are
/// read and replaced, there is no partial update.
pub trait Storage: fmt::Debug + Send {
    /// Read a value.
    fn get(&self, key: &str) -> Option<String>;
    /// Replace a value.
    fn set(&mut self, key: &str, value: String) -> Result<()>;
    /// Delete a value.
    fn remove(&mut self, key: &str);
}

/// In-memory storage.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    /// Stored values.
    items: BTreeMap<String, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// A product the visitor looked at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    /// Identifier; the product path.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Absolute product URL.
    pub url: String,
    /// Unique product path, e.g. `/p/salt`.
    pub slug: String,
    /// Card image URL; empty when none is known.
    #[serde(default)]
    pub image: String,
    /// Card image presentation, e.g. `Cover`.
    #[serde(default)]
    pub listing_image_type: Option<String>,
}

/// A most-recent-first list of products, capped and unique by slug.
#[derive(Debug, Clone)]
pub struct RecentList {
    /// Storage key.
    key: String,
    /// Maximum entries kept.
    capacity: usize,
}

impl RecentList {
    /// A list stored under `key` holding at most `capacity` entries.
    pub fn new(key: impl Into<String>, capacity: usize) -> Self {
        Self {
            key: key.into(),
            capacity,
        }
    }

    /// Read the stored list. A missing key is an empty list.
    pub fn load(&self, storage: &dyn Storage) -> Result<Vec<RecentItem>> {
        match storage.get(&self.key) {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(vec![]),
        }
    }

    /// Move `item` to the front, dropping any entry with the same slug and the
    /// oldest entry beyond capacity. Returns the new list.
    pub fn record(&self, storage: &mut dyn Storage, item: RecentItem) -> Result<Vec<RecentItem>> {
        let mut items = self.load(storage)?;
        items.retain(|i| i.slug != item.slug);
        items.insert(0, item);
        items.truncate(self.capacity);
        storage.set(&self.key, serde_json::to_string(&items)?)?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(slug: &str) -> RecentItem {
        RecentItem {
            id: slug.into(),
            name: slug.to_uppercase(),
            url: format!("https://example.com{slug}"),
            slug: slug.into(),
            image: String::new(),
            listing_image_type: None,
        }
    }

    fn slugs(items: &[RecentItem]) -> Vec<&str> {
        items.iter().map(|i| i.slug.as_str()).collect()
    }

    #[test]
    fn dedup_moves_to_front() -> Result<()> {
        let mut s = MemoryStorage::default();
        let list = RecentList::new("recentlyViewedProducts", 13);
        for slug in ["a", "b", "c"] {
            list.record(&mut s, item(slug))?;
        }
        assert_eq!(slugs(&list.load(&s)?), vec!["c", "b", "a"]);
        let items = list.record(&mut s, item("a"))?;
        assert_eq!(slugs(&items), vec!["a", "c", "b"]);
        Ok(())
    }

    #[test]
    fn capped() -> Result<()> {
        let mut s = MemoryStorage::default();
        let list = RecentList::new("k", 13);
        for i in 0..13 {
            list.record(&mut s, item(&format!("/p/{i}")))?;
        }
        let items = list.record(&mut s, item("/p/new"))?;
        assert_eq!(items.len(), 13);
        assert_eq!(items[0].slug, "/p/new");
        assert!(!items.iter().any(|i| i.slug == "/p/0"));
        Ok(())
    }

    #[test]
    fn wire_format() -> Result<()> {
        let mut s = MemoryStorage::default();
        s.set(
            "k",
            r#"[{"id":"/p/x","name":"X","url":"u","slug":"/p/x","image":"i.png","listingImageType":"Cover"}]"#
                .into(),
        )?;
        let items = RecentList::new("k", 13).load(&s)?;
        assert_eq!(items[0].listing_image_type.as_deref(), Some("Cover"));

        s.set("k", "not json".into())?;
        assert!(RecentList::new("k", 13).load(&s).is_err());
        Ok(())
    }
}
