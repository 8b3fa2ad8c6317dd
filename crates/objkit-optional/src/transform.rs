//! Chainable transformations. None of them runs a callback on an empty
//! container.

use crate::optional::Optional;

impl<T> Optional<T> {
    /// Apply `mapper` to the contained value.
    ///
    /// The result is wrapped exactly once: a mapper returning an `Optional`
    /// yields `Optional<Optional<_>>`. Use [`flat_map`](Self::flat_map) to
    /// avoid the extra layer.
    pub fn map<U, F>(&self, mapper: F) -> Optional<U>
    where
        F: FnOnce(&T) -> U,
    {
        match self.as_option() {
            Some(v) => self.derive(Some(mapper(v))),
            None => self.derive(None),
        }
    }

    /// Apply a mapper that itself returns a container.
    pub fn flat_map<U, F>(&self, mapper: F) -> Optional<U>
    where
        F: FnOnce(&T) -> Optional<U>,
    {
        match self.as_option() {
            Some(v) => mapper(v),
            None => self.derive(None),
        }
    }

    /// Like [`flat_map`](Self::flat_map) for a mapper returning a
    /// doubly-nested container: exactly one extra layer is collapsed.
    ///
    /// An empty outer result collapses to an empty container.
    pub fn flat_map_nested<U, F>(&self, mapper: F) -> Optional<U>
    where
        F: FnOnce(&T) -> Optional<Optional<U>>,
    {
        match self.as_option() {
            Some(v) => mapper(v).flatten(),
            None => self.derive(None),
        }
    }

    /// Keep the value only if `predicate` holds.
    ///
    /// When it holds, the receiver itself is returned (same instance).
    pub fn filter<P>(&self, predicate: P) -> Optional<T>
    where
        P: FnOnce(&T) -> bool,
    {
        if let Some(v) = self.as_option() {
            if predicate(v) {
                return self.clone();
            }
        }
        self.derive(None)
    }
}

impl<U> Optional<Optional<U>> {
    /// Remove one layer of nesting. The inner instance is returned as-is.
    pub fn flatten(&self) -> Optional<U> {
        match self.as_option() {
            Some(inner) => inner.clone(),
            None => self.derive(None),
        }
    }
}
