//! Store Module
//!
//! A slot table plus the capacity metadata it was created with.
//!
//! ## Responsibilities
//! - Validate capacity at creation (`max_data`, `max_rows` both positive)
//! - Enforce the per-field length limit (`max_data - 1` bytes of content)
//! - Expose create/get/set/delete/list over the slot table
//!
//! The store is a plain in-memory value; persisting it is the job of
//! [`Session`](crate::session::Session).

use crate::codec::FileHeader;
use crate::config::{Config, FieldPolicy, MAX_ROWS_LIMIT};
use crate::error::{Result, SlotDbError};
use crate::record::{Record, RowId};
use crate::table::{Records, SlotTable};

/// Fixed-capacity record store
#[derive(Debug, Clone)]
pub struct Store {
    /// Maximum bytes per text field, terminator byte included
    max_data: usize,

    /// How oversized fields are handled by `set`
    field_policy: FieldPolicy,

    /// All records, addressed by id
    table: SlotTable,
}

impl Store {
    /// Create an empty store, rejecting oversized fields
    pub fn create(max_data: i32, max_rows: i32) -> Result<Self> {
        Self::with_policy(max_data, max_rows, FieldPolicy::Reject)
    }

    /// Create an empty store with an explicit field policy
    pub fn with_policy(max_data: i32, max_rows: i32, field_policy: FieldPolicy) -> Result<Self> {
        if max_data <= 0 {
            return Err(SlotDbError::InvalidCapacity(format!(
                "max_data must be positive, got {}",
                max_data
            )));
        }
        if max_rows <= 0 || max_rows > MAX_ROWS_LIMIT {
            return Err(SlotDbError::InvalidCapacity(format!(
                "max_rows must be in 1..={}, got {}",
                MAX_ROWS_LIMIT, max_rows
            )));
        }

        Ok(Self {
            max_data: max_data as usize,
            field_policy,
            table: SlotTable::new(max_rows as usize)?,
        })
    }

    /// Create an empty store sized by the config
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_policy(config.max_data, config.max_rows, config.field_policy)
    }

    /// Create an empty store sized by a (validated) file header
    pub(crate) fn from_header(header: &FileHeader, field_policy: FieldPolicy) -> Result<Self> {
        header.validate()?;
        Self::with_policy(header.max_data, header.max_rows, field_policy).map_err(|e| match e {
            SlotDbError::InvalidCapacity(msg) => SlotDbError::CorruptRecord(msg),
            other => other,
        })
    }

    /// Get the record with the given id, or `None` if its slot is empty
    pub fn get(&self, id: RowId) -> Result<Option<&Record>> {
        self.table.get(id)
    }

    /// Store a new record at slot `id`
    ///
    /// Fails with `OutOfRange`, `SlotOccupied` (delete first), or
    /// `FieldTooLong` under [`FieldPolicy::Reject`].
    pub fn set(&mut self, id: RowId, name: &str, email: &str) -> Result<()> {
        if self.table.get(id)?.is_some() {
            return Err(SlotDbError::SlotOccupied(id));
        }

        let name = self.fit_field("name", name)?;
        let email = self.fit_field("email", email)?;

        self.table.set(Record::new(id, name, email))
    }

    /// Empty slot `id`. Returns whether a record was removed.
    pub fn delete(&mut self, id: RowId) -> Result<bool> {
        Ok(self.table.delete(id)?.is_some())
    }

    /// All occupied records in increasing id order
    pub fn list(&self) -> Records<'_> {
        self.table.iter()
    }

    /// Insert a record read back from disk
    ///
    /// Anything that would be rejected by `set` is reported as corruption.
    pub(crate) fn restore(&mut self, record: Record) -> Result<()> {
        let max = self.max_field_len();
        for (field, value) in [("name", record.name()), ("email", record.email())] {
            if value.len() > max {
                return Err(SlotDbError::CorruptRecord(format!(
                    "Row {}: {} is {} bytes (max {})",
                    record.id(),
                    field,
                    value.len(),
                    max
                )));
            }
        }

        let id = record.id();
        self.table.set(record).map_err(|e| match e {
            SlotDbError::OutOfRange { max_rows, .. } => SlotDbError::CorruptRecord(format!(
                "Row id {} outside table of {} slots",
                id, max_rows
            )),
            SlotDbError::SlotOccupied(_) => {
                SlotDbError::CorruptRecord(format!("Row id {} appears twice", id))
            }
            other => other,
        })
    }

    /// Header describing this store's capacity and occupancy
    pub fn header(&self) -> FileHeader {
        FileHeader {
            max_data: self.max_data as i32,
            max_rows: self.table.max_rows() as i32,
            current_rows: self.table.current_rows() as i32,
        }
    }

    pub fn max_data(&self) -> usize {
        self.max_data
    }

    pub fn max_rows(&self) -> usize {
        self.table.max_rows()
    }

    pub fn current_rows(&self) -> usize {
        self.table.current_rows()
    }

    /// Longest permitted field content in bytes
    pub fn max_field_len(&self) -> usize {
        self.max_data - 1
    }

    pub fn field_policy(&self) -> FieldPolicy {
        self.field_policy
    }

    /// Apply the field policy to one text value
    fn fit_field<'v>(&self, field: &'static str, value: &'v str) -> Result<&'v str> {
        let max = self.max_field_len();
        if value.len() <= max {
            return Ok(value);
        }

        match self.field_policy {
            FieldPolicy::Reject => Err(SlotDbError::FieldTooLong {
                field,
                len: value.len(),
                max,
            }),
            FieldPolicy::Truncate => Ok(truncate_on_char_boundary(value, max)),
        }
    }
}

fn truncate_on_char_boundary(value: &str, max: usize) -> &str {
    let mut end = max;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
