//! SlotTable implementation

use crate::error::{Result, SlotDbError};
use crate::record::{Record, RowId};

use super::Records;

/// Fixed number of record slots addressed by id
#[derive(Debug, Clone)]
pub struct SlotTable {
    slots: Vec<Option<Record>>,
    current_rows: usize,
}

impl SlotTable {
    /// Create a table with `max_rows` empty slots
    ///
    /// Fails with `InvalidCapacity` if the slots cannot be allocated.
    pub fn new(max_rows: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(max_rows).map_err(|e| {
            SlotDbError::InvalidCapacity(format!("Cannot allocate {} slots: {}", max_rows, e))
        })?;
        slots.resize_with(max_rows, || None);

        Ok(Self {
            slots,
            current_rows: 0,
        })
    }

    /// Map an id onto a slot index, failing with `OutOfRange`
    pub fn slot_index(&self, id: RowId) -> Result<usize> {
        usize::try_from(id)
            .ok()
            .filter(|&index| index < self.slots.len())
            .ok_or(SlotDbError::OutOfRange {
                id,
                max_rows: self.slots.len(),
            })
    }

    /// Get the record in slot `id`, or `None` if the slot is empty
    pub fn get(&self, id: RowId) -> Result<Option<&Record>> {
        let index = self.slot_index(id)?;
        Ok(self.slots[index].as_ref())
    }

    /// Store a record in the slot named by its id
    ///
    /// Never overwrites: an occupied slot fails with `SlotOccupied`.
    pub fn set(&mut self, record: Record) -> Result<()> {
        let index = self.slot_index(record.id())?;
        let slot = &mut self.slots[index];

        if slot.is_some() {
            return Err(SlotDbError::SlotOccupied(record.id()));
        }

        *slot = Some(record);
        self.current_rows += 1;
        Ok(())
    }

    /// Empty slot `id`, returning the record it held
    ///
    /// Deleting an empty slot is a no-op and returns `None`.
    pub fn delete(&mut self, id: RowId) -> Result<Option<Record>> {
        let index = self.slot_index(id)?;
        let removed = self.slots[index].take();

        if removed.is_some() {
            self.current_rows -= 1;
        }
        Ok(removed)
    }

    /// Iterate over occupied slots in increasing id order
    pub fn iter(&self) -> Records<'_> {
        Records::new(&self.slots)
    }

    /// Number of occupied slots
    pub fn current_rows(&self) -> usize {
        self.current_rows
    }

    /// Total number of slots
    pub fn max_rows(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current_rows == 0
    }

    pub fn is_full(&self) -> bool {
        self.current_rows == self.slots.len()
    }
}

impl<'a> IntoIterator for &'a SlotTable {
    type Item = &'a Record;
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
