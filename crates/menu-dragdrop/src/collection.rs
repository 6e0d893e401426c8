//! Ordered Collection
//!
//! Order-preserving, duplicate-free sequence of keyed elements.
//! Every reorderable level of the menu (categories, items, sides) is one of these.

use std::fmt::Debug;

/// Elements that carry a stable identity inside a collection
pub trait Keyed {
    type Key: Clone + Eq + Debug;

    fn key(&self) -> &Self::Key;
}

impl Keyed for String {
    type Key = String;

    fn key(&self) -> &String {
        self
    }
}

/// Collection errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("index {index} out of bounds for collection of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("duplicate key: {0}")]
    Duplicate(String),
}

/// A sequence where identity is stable and position is meaningful
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedCollection<T: Keyed> {
    elements: Vec<T>,
}

impl<T: Keyed> Default for OrderedCollection<T> {
    fn default() -> Self {
        Self { elements: Vec::new() }
    }
}

impl<T: Keyed> OrderedCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a vector, rejecting repeated keys
    pub fn from_vec(elements: Vec<T>) -> Result<Self, CollectionError> {
        let mut collection = Self::new();
        for element in elements {
            collection.push(element)?;
        }
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.position(key).is_some()
    }

    /// Index of the element with this key
    pub fn position(&self, key: &T::Key) -> Option<usize> {
        self.elements.iter().position(|e| e.key() == key)
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.elements.iter().find(|e| e.key() == key)
    }

    pub fn get_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.elements.iter_mut().find(|e| e.key() == key)
    }

    /// Append at the end
    pub fn push(&mut self, element: T) -> Result<(), CollectionError> {
        let len = self.len();
        self.insert_at(len, element)
    }

    /// Insert at `index`; valid range is `[0, len]`
    pub fn insert_at(&mut self, index: usize, element: T) -> Result<(), CollectionError> {
        if index > self.elements.len() {
            return Err(CollectionError::IndexOutOfBounds {
                index,
                len: self.elements.len(),
            });
        }
        if self.contains(element.key()) {
            return Err(CollectionError::Duplicate(format!("{:?}", element.key())));
        }
        self.elements.insert(index, element);
        Ok(())
    }

    /// Remove by key, `None` when absent
    pub fn remove_by_id(&mut self, key: &T::Key) -> Option<T> {
        let index = self.position(key)?;
        Some(self.elements.remove(index))
    }

    /// Move the element at `from` to `to`, shifting the ones in between.
    ///
    /// `to` is clamped to `[0, len - 1]`. Returns the index the element ended up at.
    pub fn move_within(&mut self, from: usize, to: usize) -> Result<usize, CollectionError> {
        let len = self.elements.len();
        if from >= len {
            return Err(CollectionError::IndexOutOfBounds { index: from, len });
        }
        let to = to.min(len - 1);
        if from != to {
            let element = self.elements.remove(from);
            self.elements.insert(to, element);
        }
        Ok(to)
    }

    /// Keys in display order, the shape persisted to the store
    pub fn ids_in_order(&self) -> Vec<T::Key> {
        self.elements.iter().map(|e| e.key().clone()).collect()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a OrderedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
