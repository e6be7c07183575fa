//! Mask ownership and single-step undo.

use ndarray::Array2;

use crate::error::{ensure_shape, MaskError};
use crate::Mask;

/// Owns the mask of the current image.
///
/// The mask is created lazily (all false) on the first edit and always has
/// the shape of the image passed to [`MaskStore::reset`]. Undo keeps exactly
/// one snapshot: taking a new one overwrites the previous slot.
#[derive(Debug, Clone, Default)]
pub struct MaskStore {
    shape: Option<(usize, usize)>,
    mask: Option<Mask>,
    undo: Option<Mask>,
    dirty: bool,
}

impl MaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store bound to an image of the given shape, with no mask yet.
    pub fn with_shape(shape: (usize, usize)) -> Self {
        let mut store = Self::default();
        store.reset(shape);
        store
    }

    /// Image changed: drop the mask and its undo slot.
    pub fn reset(&mut self, shape: (usize, usize)) {
        self.shape = Some(shape);
        self.mask = None;
        self.undo = None;
        self.dirty = true;
    }

    pub fn shape(&self) -> Option<(usize, usize)> {
        self.shape
    }

    pub fn current(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// Current mask, creating an all-false one on first use.
    ///
    /// Returns `None` while no image shape is known.
    pub fn ensure(&mut self) -> Option<&Mask> {
        let shape = self.shape?;
        Some(self.mask.get_or_insert_with(|| Array2::from_elem(shape, false)))
    }

    /// Swap in a new mask and flag the display for refresh.
    pub fn replace(&mut self, mask: Mask) -> Result<(), MaskError> {
        match self.shape {
            Some(shape) => ensure_shape(shape, mask.dim())?,
            None => self.shape = Some(mask.dim()),
        }
        self.mask = Some(mask);
        self.dirty = true;
        Ok(())
    }

    /// Edit the mask in place, creating it first if needed.
    ///
    /// Returns `None` (without calling `edit`) while no image shape is known.
    pub fn modify<R>(&mut self, edit: impl FnOnce(&mut Mask) -> R) -> Option<R> {
        let shape = self.shape?;
        let mask = self.mask.get_or_insert_with(|| Array2::from_elem(shape, false));
        let result = edit(mask);
        self.dirty = true;
        Some(result)
    }

    /// Copy the current mask into the undo slot before a gesture.
    pub fn snapshot_for_edit(&mut self) {
        if let Some(mask) = &self.mask {
            self.undo = Some(mask.clone());
        }
    }

    /// Restore the snapshot taken at the start of the last gesture.
    pub fn undo_last(&mut self) {
        if let Some(previous) = self.undo.take() {
            self.mask = Some(previous);
            self.dirty = true;
        }
    }

    pub fn can_undo(&self) -> bool {
        self.undo.is_some()
    }

    /// Number of selected pixels (0 without a mask).
    pub fn count(&self) -> usize {
        self.mask
            .as_ref()
            .map_or(0, |m| m.iter().filter(|&&v| v).count())
    }

    /// Returns whether the display needs a refresh and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_creation() {
        let mut store = MaskStore::with_shape((4, 3));
        assert!(store.current().is_none());
        let mask = store.ensure().unwrap();
        assert_eq!(mask.dim(), (4, 3));
        assert!(mask.iter().all(|&v| !v));

        let mut empty = MaskStore::new();
        assert!(empty.ensure().is_none());
    }

    #[test]
    fn test_snapshot_without_mask_is_noop() {
        let mut store = MaskStore::with_shape((2, 2));
        store.snapshot_for_edit();
        assert!(!store.can_undo());
        store.undo_last();
        assert!(store.current().is_none());
    }

    #[test]
    fn test_single_level_undo() {
        let mut store = MaskStore::with_shape((2, 2));
        store.ensure();

        store.snapshot_for_edit();
        let mut first = Array2::from_elem((2, 2), false);
        first[[0, 0]] = true;
        store.replace(first.clone()).unwrap();

        store.snapshot_for_edit();
        let second = Array2::from_elem((2, 2), true);
        store.replace(second).unwrap();

        store.undo_last();
        assert_eq!(store.current(), Some(&first));
        // Only one level is kept
        store.undo_last();
        assert_eq!(store.current(), Some(&first));
        assert!(!store.can_undo());
    }

    #[test]
    fn test_replace_rejects_wrong_shape() {
        let mut store = MaskStore::with_shape((3, 3));
        let err = store.replace(Array2::from_elem((3, 2), true)).unwrap_err();
        assert!(matches!(err, MaskError::ShapeMismatch { .. }));
        assert!(store.current().is_none());
    }

    #[test]
    fn test_dirty_flag_and_reset() {
        let mut store = MaskStore::with_shape((2, 2));
        assert!(store.take_dirty());
        assert!(!store.take_dirty());
        store.replace(Array2::from_elem((2, 2), true)).unwrap();
        assert_eq!(store.count(), 4);
        assert!(store.take_dirty());

        store.snapshot_for_edit();
        store.reset((5, 5));
        assert!(store.current().is_none());
        assert!(!store.can_undo());
        assert_eq!(store.shape(), Some((5, 5)));
    }

    #[test]
    fn test_modify_in_place() {
        let mut store = MaskStore::with_shape((3, 3));
        store.take_dirty();
        store.modify(|m| m[[1, 2]] = true);
        assert_eq!(store.count(), 1);
        assert!(store.take_dirty());

        let mut unbound = MaskStore::new();
        assert!(unbound.modify(|m| m.fill(true)).is_none());
    }
}
