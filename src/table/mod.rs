//! Slot Table Module
//!
//! Fixed-length, directly addressed storage for records.
//!
//! ## Responsibilities
//! - Own every record
//! - Address slots by id (slot `i` only ever holds the record with id `i`)
//! - Keep `current_rows` equal to the number of occupied slots
//! - Ordered iteration for listing and saving
//!
//! ## Data Structure Choice
//! `Vec<Option<Record>>` sized once at creation. No open addressing and no
//! tombstones: deleting a record simply empties its slot.

mod iterator;
mod slots;

pub use iterator::Records;
pub use slots::SlotTable;
