//! Record definition
//!
//! One row of the store. A slot is occupied exactly when it holds a `Record`.

use std::fmt;

/// Row identifier. Doubles as the slot index.
pub type RowId = i32;

/// A single row: id, name, email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: RowId,
    name: String,
    email: String,
}

impl Record {
    /// Create a record. Length limits are enforced by the `Store`, not here.
    pub fn new(id: RowId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Encoded size on disk: row header + name + email
    pub fn encoded_len(&self) -> usize {
        crate::codec::ROW_HEADER_SIZE + self.name.len() + self.email.len()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.id, self.name, self.email)
    }
}
