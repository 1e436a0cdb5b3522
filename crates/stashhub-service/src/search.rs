//! Case- and diacritic-insensitive search over the cached inventory.

use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use stashhub_entity::container::Container;
use stashhub_entity::item::Item;

use crate::inventory::InventoryCache;

/// What a search query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Match item names; each hit carries the item and its container.
    Items,
    /// Match container names.
    Containers,
}

/// One search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// The container the hit lives in.
    pub container: Container,
    /// The matching item, in [`SearchMode::Items`] mode.
    pub item: Option<Item>,
}

/// Substring search over the [`InventoryCache`], so results reflect
/// exactly what the user currently sees. Purely local, no remote reads.
pub struct SearchService {
    cache: Arc<InventoryCache>,
}

impl SearchService {
    /// Create a search service over the shared cache.
    pub fn new(cache: Arc<InventoryCache>) -> Self {
        Self { cache }
    }

    /// Find containers or items whose name contains the query,
    /// ignoring case and diacritics. An empty query matches nothing.
    pub async fn search(&self, query: &str, mode: SearchMode) -> Vec<SearchHit> {
        let needle = normalize(query);
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for entry in self.cache.snapshot_all().await {
            match mode {
                SearchMode::Containers => {
                    if normalize(&entry.container.name).contains(&needle) {
                        hits.push(SearchHit {
                            container: entry.container.clone(),
                            item: None,
                        });
                    }
                }
                SearchMode::Items => {
                    for item in &entry.items {
                        if normalize(&item.name).contains(&needle) {
                            hits.push(SearchHit {
                                container: entry.container.clone(),
                                item: Some(item.clone()),
                            });
                        }
                    }
                }
            }
        }

        hits.sort_by(|a, b| {
            let by_container = a.container.name.cmp(&b.container.name);
            by_container.then_with(|| {
                let a_name = a.item.as_ref().map(|i| i.name.as_str()).unwrap_or("");
                let b_name = b.item.as_ref().map(|i| i.name.as_str()).unwrap_or("");
                a_name.cmp(b_name)
            })
        });
        hits
    }
}

/// NFD-decompose, strip combining marks, lowercase.
fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics() {
        assert_eq!(normalize("Perceuse à colonne"), "perceuse a colonne");
        assert_eq!(normalize("  Füllfederhalter "), "fullfederhalter");
    }

    #[test]
    fn test_normalize_empty_query() {
        assert_eq!(normalize("   "), "");
    }
}
