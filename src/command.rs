//! Command definitions
//!
//! Typed commands a caller (such as the CLI) runs against an open session,
//! and the replies they produce.

use crate::record::{Record, RowId};

/// A command against an open session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read one slot
    Get { id: RowId },

    /// Fill an empty slot
    Set {
        id: RowId,
        name: String,
        email: String,
    },

    /// Empty a slot
    Delete { id: RowId },

    /// Read every occupied slot
    List,
}

/// Result of a successfully executed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Mutation applied
    Done,

    /// Contents of one slot (`None` when empty)
    Record(Option<Record>),

    /// All occupied records in id order
    Records(Vec<Record>),
}
