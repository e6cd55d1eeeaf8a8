//! Custom category vocabulary read from the content store.

use std::{collections::BTreeSet, sync::Arc};

use {darkroom_store::CategorySource, tracing::warn};

use crate::scoring::CATEGORY_SEPARATOR;

/// Reads the category names already in use across the content store.
pub struct VocabularyReader {
    source: Arc<dyn CategorySource>,
}

impl VocabularyReader {
    pub fn new(source: Arc<dyn CategorySource>) -> Self {
        Self { source }
    }

    /// Atomic, deduplicated custom category names, sorted.
    ///
    /// Fails closed: a read error yields an empty set so scoring falls back
    /// to the built-in table alone.
    pub async fn fetch_custom_categories(&self) -> BTreeSet<String> {
        match self.source.distinct_categories().await {
            Ok(values) => split_categories(values),
            Err(e) => {
                warn!(error = %e, "failed to read custom categories, using built-in table only");
                BTreeSet::new()
            },
        }
    }
}

/// Split composite `"A, B"` values into trimmed atomic names, dropping
/// empties. Deduplication is case-sensitive.
pub fn split_categories<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .flat_map(|value| {
            value
                .as_ref()
                .split(CATEGORY_SEPARATOR)
                .map(|name| name.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|name| !name.is_empty())
        .collect()
}
