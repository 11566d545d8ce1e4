//! Owned entity collection for list screens

use serde::Serialize;

use crate::models::{Meal, Medication, Reading};

/// Anything with a server-assigned id
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for Reading {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Medication {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Meal {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A list that only changes by append, replace-by-id, remove-by-id, or a
/// full reload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntityList<T> {
    items: Vec<T>,
}

impl<T> Default for EntityList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Identified> EntityList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Swap in `item` where its id already sits. Returns `false` if absent.
    pub fn replace_by_id(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn remove_by_id(&mut self, id: i64) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }
}

impl<'a, T> IntoIterator for &'a EntityList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
