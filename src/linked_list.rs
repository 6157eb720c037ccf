use std::fmt;
use std::vec;

use log::{debug, trace};

use crate::error::ListError;

struct Node<T> {
    value: T,
    next: Option<usize>,
}

/// A singly linked list whose nodes live in an arena. Links, `head` and `tail`
/// are slot indices, so the tail alias is a plain `usize` and needs no unsafe.
pub struct List<T> {
    // `None` slots are vacant and listed in `free`.
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    length: usize,
}

pub struct IntoIter<T>(List<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.shift().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.length, Some(self.0.length))
    }
}

/// Follows `next` links from the head.
pub struct Iter<'a, T> {
    list: &'a List<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.value)
    }
}

/// Mutable references to every value, already arranged in list order.
pub struct IterMut<'a, T>(vec::IntoIter<&'a mut T>);

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<T> List<T> {
    pub fn new() -> Self {
        List {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            length: 0,
        }
    }

    /// Builds a list by appending every value in order.
    pub fn from_values<I: IntoIterator<Item = T>>(values: I) -> Self {
        let mut list = List::new();
        for value in values {
            list.push(value);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn peek(&self) -> Option<&T> {
        self.node(self.head?).map(|node| &node.value)
    }

    pub fn peek_last(&self) -> Option<&T> {
        self.node(self.tail?).map(|node| &node.value)
    }

    /// Appends `value` after the current tail.
    pub fn push(&mut self, value: T) {
        let slot = self.alloc(value, None);

        match self.tail {
            None => self.head = Some(slot),
            Some(tail) => {
                if let Some(node) = self.node_mut(tail) {
                    node.next = Some(slot);
                }
            }
        }

        self.tail = Some(slot);
        self.length += 1;
        trace!("push: slot {}, length {}", slot, self.length);
    }

    /// Inserts `value` in front of the current head.
    pub fn unshift(&mut self, value: T) {
        let slot = self.alloc(value, self.head);
        self.head = Some(slot);

        if self.length == 0 {
            self.tail = Some(slot);
        }

        self.length += 1;
        trace!("unshift: slot {}, length {}", slot, self.length);
    }

    pub fn get_at(&self, index: usize) -> Result<&T, ListError> {
        self.check_index(index, self.length)?;
        self.slot_at(index)
            .and_then(|slot| self.node(slot))
            .map(|node| &node.value)
            .ok_or(self.invalid_index(index))
    }

    pub fn get_at_mut(&mut self, index: usize) -> Result<&mut T, ListError> {
        self.check_index(index, self.length)?;
        let err = self.invalid_index(index);
        let slot = self.slot_at(index).ok_or(err)?;
        self.node_mut(slot).map(|node| &mut node.value).ok_or(err)
    }

    /// Overwrites the value at `index` in place.
    pub fn set_at(&mut self, index: usize, value: T) -> Result<(), ListError> {
        *self.get_at_mut(index)? = value;
        Ok(())
    }

    /// Inserts `value` before `index`. `index == len()` appends.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), ListError> {
        self.check_index(index, self.length + 1)?;
        let err = self.invalid_index(index);

        if index == 0 {
            self.unshift(value);
            return Ok(());
        }
        if index == self.length {
            self.push(value);
            return Ok(());
        }

        let prev = self.slot_at(index - 1).ok_or(err)?;
        let next = self.node(prev).ok_or(err)?.next;
        let slot = self.alloc(value, next);
        if let Some(node) = self.node_mut(prev) {
            node.next = Some(slot);
        }

        self.length += 1;
        trace!("insert_at {}: slot {}, length {}", index, slot, self.length);
        Ok(())
    }

    /// Unlinks the node at `index` and returns its value.
    pub fn remove_at(&mut self, index: usize) -> Result<T, ListError> {
        self.check_index(index, self.length)?;
        let err = self.invalid_index(index);

        if index == 0 {
            let head = self.head.ok_or(err)?;
            let Node { value, next } = self.release(head).ok_or(err)?;
            self.head = next;
            self.length -= 1;
            // Zero or one node left: tail is whatever head is now.
            if self.length < 2 {
                self.tail = self.head;
            }
            trace!("remove_at 0: length {}", self.length);
            return Ok(value);
        }

        let removing_tail = index == self.length - 1;
        let prev = self.slot_at(index - 1).ok_or(err)?;
        let removed = self.node(prev).and_then(|node| node.next).ok_or(err)?;
        let Node { value, next } = self.release(removed).ok_or(err)?;
        if let Some(node) = self.node_mut(prev) {
            node.next = next;
        }

        if removing_tail {
            self.tail = Some(prev);
        }

        self.length -= 1;
        trace!("remove_at {}: length {}", index, self.length);
        Ok(value)
    }

    /// Removes and returns the last value.
    pub fn pop(&mut self) -> Result<T, ListError> {
        if self.is_empty() {
            debug!("pop on empty list");
            return Err(self.invalid_index(0));
        }
        self.remove_at(self.length - 1)
    }

    /// Removes and returns the first value.
    pub fn shift(&mut self) -> Result<T, ListError> {
        if self.is_empty() {
            debug!("shift on empty list");
            return Err(self.invalid_index(0));
        }
        self.remove_at(0)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.length = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        // Rank every occupied slot by its list position, then hand out the
        // disjoint borrows from a single pass over the arena.
        let mut rank = vec![usize::MAX; self.slots.len()];
        let mut cursor = self.head;
        let mut position = 0;
        while let Some(slot) = cursor {
            rank[slot] = position;
            position += 1;
            cursor = self.node(slot).and_then(|node| node.next);
        }

        let mut ordered: Vec<Option<&mut T>> = (0..self.length).map(|_| None).collect();
        for (slot, node) in self.slots.iter_mut().enumerate() {
            if let (Some(node), Some(entry)) = (node, ordered.get_mut(rank[slot])) {
                *entry = Some(&mut node.value);
            }
        }

        IterMut(ordered.into_iter().flatten().collect::<Vec<_>>().into_iter())
    }

    fn alloc(&mut self, value: T, next: Option<usize>) -> usize {
        let node = Some(Node { value, next });
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = node;
                slot
            }
            None => {
                self.slots.push(node);
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, slot: usize) -> Option<Node<T>> {
        let node = self.slots.get_mut(slot)?.take()?;
        self.free.push(slot);
        Some(node)
    }

    fn node(&self, slot: usize) -> Option<&Node<T>> {
        self.slots.get(slot)?.as_ref()
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(slot)?.as_mut()
    }

    fn check_index(&self, index: usize, bound: usize) -> Result<(), ListError> {
        if index < bound {
            Ok(())
        } else {
            debug!("rejected index {} (bound {})", index, bound);
            Err(self.invalid_index(index))
        }
    }

    fn invalid_index(&self, index: usize) -> ListError {
        ListError::InvalidIndex { index, len: self.length }
    }

    // Walks `index` links from the head. No bounds check: callers validate first.
    fn slot_at(&self, index: usize) -> Option<usize> {
        let mut current = self.head;
        for _ in 0..index {
            current = self.node(current?)?.next;
        }
        current
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        assert_eq!(self.length == 0, self.head.is_none());
        assert_eq!(self.length == 0, self.tail.is_none());

        let mut count = 0;
        let mut last = None;
        let mut current = self.head;
        while let Some(slot) = current {
            count += 1;
            assert!(count <= self.length, "cycle or overlong chain");
            last = Some(slot);
            current = self.node(slot).expect("link to vacant slot").next;
        }
        assert_eq!(self.length, count);
        assert_eq!(last, self.tail);

        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(self.length, occupied);
        assert_eq!(self.slots.len(), occupied + self.free.len());
        assert!(self.free.iter().all(|&slot| self.slots[slot].is_none()));
    }
}

impl<T: Copy + Into<f64>> List<T> {
    /// Mean of all values, or `0.0` for an empty list.
    pub fn average(&self) -> f64 {
        if self.length == 0 {
            return 0.0;
        }
        let total: f64 = self.iter().map(|&value| value.into()).sum();
        total / self.length as f64
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List::new()
    }
}

impl<T: Clone> Clone for List<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for List<T> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for List<T> {}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, "]")
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        List::from_values(iter)
    }
}

impl<T> From<Vec<T>> for List<T> {
    fn from(values: Vec<T>) -> Self {
        List::from_values(values)
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl<T> IntoIterator for List<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter(self)
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut List<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
