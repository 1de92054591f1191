//! Ordered photo collection with block-list semantics.

use std::collections::HashSet;

use tracing::debug;

use super::model::{ContentHash, PhotoRecord};
use crate::{Error, Result};

/// A user edit to the collection.
///
/// Every interactive action on the photo list is one of these, applied
/// through [`PhotoStore::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Replace the label of the photo at an index.
    SetLabel(usize, String),
    /// Flip the selection flag of the photo at an index.
    ToggleSelection(usize),
    /// Clear every selection flag.
    DeselectAll,
    /// Move the selected photos one position towards the front.
    MoveSelectedUp,
    /// Move the selected photos one position towards the back.
    MoveSelectedDown,
    /// Remove the selected photos and block their content.
    RemoveSelected,
}

/// Ordered photo collection plus the session's block-list.
///
/// Invariants:
/// - no two records share a content hash;
/// - a blocked hash is never present in the collection;
/// - collection order is page order.
#[derive(Debug, Clone, Default)]
pub struct PhotoStore {
    photos: Vec<PhotoRecord>,
    blocked: HashSet<ContentHash>,
}

impl PhotoStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Photos in page order.
    #[must_use]
    pub fn photos(&self) -> &[PhotoRecord] {
        &self.photos
    }

    /// Number of photos.
    #[must_use]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    /// True when the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// True if a photo with this hash is in the collection.
    #[must_use]
    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.photos.iter().any(|p| &p.content_hash == hash)
    }

    /// True if this hash was removed by the user.
    #[must_use]
    pub fn is_blocked(&self, hash: &ContentHash) -> bool {
        self.blocked.contains(hash)
    }

    /// Number of selected photos.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.photos.iter().filter(|p| p.selected).count()
    }

    /// Adds a photo at the end.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Blocked`] or [`Error::Duplicate`] if the record's hash
    /// is blocked or already present.
    pub fn append(&mut self, record: PhotoRecord) -> Result<()> {
        if self.is_blocked(&record.content_hash) {
            return Err(Error::Blocked(record.content_hash.to_string()));
        }
        if self.contains(&record.content_hash) {
            return Err(Error::Duplicate(record.content_hash.to_string()));
        }
        debug!(
            "Appending {} as photo {}",
            record.display_name,
            self.photos.len() + 1
        );
        self.photos.push(record);
        Ok(())
    }

    /// Applies a user edit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] for index-based edits past the end.
    pub fn apply(&mut self, edit: Edit) -> Result<()> {
        match edit {
            Edit::SetLabel(index, text) => self.set_label(index, text)?,
            Edit::ToggleSelection(index) => self.toggle_selection(index)?,
            Edit::DeselectAll => self.deselect_all(),
            Edit::MoveSelectedUp => self.move_selected_up(),
            Edit::MoveSelectedDown => self.move_selected_down(),
            Edit::RemoveSelected => {
                self.remove_selected();
            }
        }
        Ok(())
    }

    /// Sets a label. Empty text is allowed and means "inherit".
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if there is no photo at `index`.
    pub fn set_label(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        self.get_mut(index)?.label = text.into();
        Ok(())
    }

    /// Flips the selection flag of one photo.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if there is no photo at `index`.
    pub fn toggle_selection(&mut self, index: usize) -> Result<()> {
        let photo = self.get_mut(index)?;
        photo.selected = !photo.selected;
        Ok(())
    }

    /// Clears every selection flag.
    pub fn deselect_all(&mut self) {
        for photo in &mut self.photos {
            photo.selected = false;
        }
    }

    /// Moves each selected photo one slot towards the front.
    ///
    /// Selected photos are visited front to back; each swaps with its
    /// predecessor only when that predecessor is not selected. A selected
    /// run touching index 0 therefore stays put (keeping its internal order)
    /// while selected photos elsewhere still move.
    pub fn move_selected_up(&mut self) {
        for i in 1..self.photos.len() {
            if self.photos[i].selected && !self.photos[i - 1].selected {
                self.photos.swap(i, i - 1);
            }
        }
    }

    /// Moves each selected photo one slot towards the back.
    ///
    /// Mirror image of [`PhotoStore::move_selected_up`]: visited back to
    /// front, a selected run touching the last index stays put.
    pub fn move_selected_down(&mut self) {
        for i in (0..self.photos.len().saturating_sub(1)).rev() {
            if self.photos[i].selected && !self.photos[i + 1].selected {
                self.photos.swap(i, i + 1);
            }
        }
    }

    /// Removes every selected photo and blocks its hash for the session.
    ///
    /// Returns the removed records in their former order.
    pub fn remove_selected(&mut self) -> Vec<PhotoRecord> {
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.photos).into_iter().partition(|p| p.selected);
        self.photos = kept;
        for photo in &removed {
            debug!("Blocking {} ({})", photo.display_name, photo.content_hash);
            self.blocked.insert(photo.content_hash.clone());
        }
        removed
    }

    /// Forgets every blocked hash.
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn clear_block_list(&mut self) {
        self.blocked.clear();
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut PhotoRecord> {
        let len = self.photos.len();
        self.photos
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(name: &str) -> PhotoRecord {
        PhotoRecord::new(
            format!("/cache/{name}.jpg"),
            ContentHash::of(name.as_bytes()),
            format!("{name}.jpg"),
        )
    }

    fn store_of(names: &[&str]) -> PhotoStore {
        let mut store = PhotoStore::new();
        for name in names {
            store.append(record(name)).unwrap();
        }
        store
    }

    fn names(store: &PhotoStore) -> Vec<String> {
        store
            .photos()
            .iter()
            .map(|p| p.display_name.trim_end_matches(".jpg").to_string())
            .collect()
    }

    fn select(store: &mut PhotoStore, indices: &[usize]) {
        for &i in indices {
            store.toggle_selection(i).unwrap();
        }
    }

    #[test]
    fn test_append_preserves_arrival_order() {
        let store = store_of(&["a", "b", "c"]);
        assert_eq!(names(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_append_rejects_duplicate_hash() {
        let mut store = store_of(&["a"]);
        assert!(matches!(store.append(record("a")), Err(Error::Duplicate(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_append_rejects_blocked_hash() {
        let mut store = store_of(&["a", "b"]);
        select(&mut store, &[0]);
        store.remove_selected();
        assert!(matches!(store.append(record("a")), Err(Error::Blocked(_))));
    }

    #[test]
    fn test_set_label_out_of_range() {
        let mut store = store_of(&["a"]);
        assert!(matches!(
            store.set_label(3, "x"),
            Err(Error::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_set_label_allows_empty() {
        let mut store = store_of(&["a"]);
        store.set_label(0, "North wall").unwrap();
        store.set_label(0, "").unwrap();
        assert!(store.photos()[0].label.is_empty());
    }

    #[test]
    fn test_move_up_single() {
        let mut store = store_of(&["a", "b", "c"]);
        select(&mut store, &[2]);
        store.move_selected_up();
        assert_eq!(names(&store), vec!["a", "c", "b"]);
        assert!(store.photos()[1].selected);
        assert!(!store.photos()[2].selected);
    }

    #[test]
    fn test_move_up_block_moves_together() {
        let mut store = store_of(&["a", "b", "c", "d"]);
        select(&mut store, &[1, 2]);
        store.move_selected_up();
        assert_eq!(names(&store), vec!["b", "c", "a", "d"]);
    }

    #[test]
    fn test_move_up_pinned_block_keeps_order() {
        let mut store = store_of(&["a", "b", "c"]);
        select(&mut store, &[0, 1]);
        store.move_selected_up();
        assert_eq!(names(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_move_up_boundary_does_not_block_others() {
        let mut store = store_of(&["a", "b", "c"]);
        select(&mut store, &[0, 2]);
        store.move_selected_up();
        assert_eq!(names(&store), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_move_down_boundary_does_not_block_others() {
        let mut store = store_of(&["a", "b", "c"]);
        select(&mut store, &[0, 2]);
        store.move_selected_down();
        assert_eq!(names(&store), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_move_with_nothing_selected_is_noop() {
        let mut store = store_of(&["a", "b"]);
        store.move_selected_up();
        store.move_selected_down();
        assert_eq!(names(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_move_on_empty_store() {
        let mut store = PhotoStore::new();
        store.move_selected_up();
        store.move_selected_down();
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_selected_blocks_and_keeps_order() {
        let mut store = store_of(&["a", "b", "c", "d"]);
        select(&mut store, &[1, 3]);
        let removed = store.remove_selected();
        assert_eq!(removed.len(), 2);
        assert_eq!(names(&store), vec!["a", "c"]);
        assert!(store.is_blocked(&ContentHash::of(b"b")));
        assert!(store.is_blocked(&ContentHash::of(b"d")));
        assert!(!store.contains(&ContentHash::of(b"b")));
    }

    #[test]
    fn test_clear_block_list_allows_re_add() {
        let mut store = store_of(&["a"]);
        select(&mut store, &[0]);
        store.remove_selected();
        store.clear_block_list();
        store.append(record("a")).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_apply_edits() {
        let mut store = store_of(&["a", "b"]);
        store.apply(Edit::ToggleSelection(1)).unwrap();
        store.apply(Edit::MoveSelectedUp).unwrap();
        store.apply(Edit::SetLabel(0, "first".into())).unwrap();
        assert_eq!(names(&store), vec!["b", "a"]);
        assert_eq!(store.photos()[0].label, "first");
        store.apply(Edit::DeselectAll).unwrap();
        assert_eq!(store.selected_count(), 0);
        assert!(store.apply(Edit::ToggleSelection(9)).is_err());
    }

    proptest! {
        /// Up then down restores order whenever no selected photo was pinned
        /// at the front.
        #[test]
        fn move_up_then_down_restores_order(mask in proptest::collection::vec(any::<bool>(), 1..12)) {
            prop_assume!(!mask[0]);
            let labels: Vec<String> = (0..mask.len()).map(|i| format!("p{i}")).collect();
            let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let mut store = store_of(&refs);
            for (i, &selected) in mask.iter().enumerate() {
                if selected {
                    store.toggle_selection(i).unwrap();
                }
            }
            let before = names(&store);
            store.move_selected_up();
            store.move_selected_down();
            prop_assert_eq!(names(&store), before);
        }

        /// Moves permute the collection without losing or duplicating photos,
        /// and selection travels with the photo.
        #[test]
        fn moves_are_permutations(
            mask in proptest::collection::vec(any::<bool>(), 0..12),
            ups in proptest::collection::vec(any::<bool>(), 0..8),
        ) {
            let labels: Vec<String> = (0..mask.len()).map(|i| format!("p{i}")).collect();
            let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
            let mut store = store_of(&refs);
            for (i, &selected) in mask.iter().enumerate() {
                if selected {
                    store.toggle_selection(i).unwrap();
                }
            }
            for up in ups {
                if up { store.move_selected_up() } else { store.move_selected_down() }
            }
            let mut after = names(&store);
            after.sort();
            let mut expected = labels.clone();
            expected.sort();
            prop_assert_eq!(after, expected);
            for photo in store.photos() {
                let index: usize = photo.display_name[1..].trim_end_matches(".jpg").parse().unwrap();
                prop_assert_eq!(photo.selected, mask[index]);
            }
        }
    }
}
