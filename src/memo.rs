//! Values cached against the id they were computed for.
//!
//! Owners bump a monotonically increasing dirty id on every mutation; a
//! `Memo` recomputes only when it is asked for a different id than the one
//! it last saw.

/// A lazily recomputed value keyed on an update id.
#[derive(Debug, Clone)]
pub struct Memo<K, T> {
    seen: Option<K>,
    value: Option<T>,
}

impl<K, T> Default for Memo<K, T> {
    fn default() -> Self {
        Memo {
            seen: None,
            value: None,
        }
    }
}

impl<K: PartialEq + Copy, T> Memo<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `id`, running `compute` only on a miss.
    pub fn get_or_update(&mut self, id: K, compute: impl FnOnce() -> T) -> &T {
        if self.seen != Some(id) {
            self.value = None;
            self.seen = Some(id);
        }
        self.value.get_or_insert_with(compute)
    }

    /// The cached value, if it was computed for `id`.
    pub fn get(&self, id: K) -> Option<&T> {
        if self.seen == Some(id) {
            self.value.as_ref()
        } else {
            None
        }
    }

    pub fn is_fresh(&self, id: K) -> bool {
        self.seen == Some(id) && self.value.is_some()
    }

    pub fn invalidate(&mut self) {
        self.seen = None;
        self.value = None;
    }
}
