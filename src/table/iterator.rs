//! Slot Table Iterator
//!
//! Sequential iteration over the occupied slots of a table.

use std::iter::FusedIterator;
use std::slice;

use crate::record::Record;

/// Iterator over occupied records in increasing id order
///
/// Cloning yields an independent iterator from the same position, so a
/// listing can be restarted by cloning it before consuming.
#[derive(Debug, Clone)]
pub struct Records<'a> {
    slots: slice::Iter<'a, Option<Record>>,
}

impl<'a> Records<'a> {
    pub(super) fn new(slots: &'a [Option<Record>]) -> Self {
        Self {
            slots: slots.iter(),
        }
    }
}

impl<'a> Iterator for Records<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.by_ref().find_map(Option::as_ref)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}

impl FusedIterator for Records<'_> {}
