//! Filtered views over the ledger's items.

use crate::item::Item;

/// Lazy, case-insensitive search over items by id or name.
///
/// Borrows the ledger, so the item set cannot change while a search is alive.
/// Cloning restarts the view from the beginning.
#[derive(Debug, Clone)]
pub struct ItemSearch<'a> {
    items: core::slice::Iter<'a, Item>,
    needle: String,
}

impl<'a> ItemSearch<'a> {
    pub(crate) fn new(items: &'a [Item], query: &str) -> Self {
        Self {
            items: items.iter(),
            needle: query.trim().to_lowercase(),
        }
    }

    /// The normalised query (trimmed, lower-cased).
    pub fn query(&self) -> &str {
        &self.needle
    }
}

impl<'a> Iterator for ItemSearch<'a> {
    type Item = &'a Item;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_str();
        self.items.by_ref().find(|item| item.matches(needle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.items.size_hint().1)
    }
}

impl core::iter::FusedIterator for ItemSearch<'_> {}
