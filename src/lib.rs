//! # slotdb
//!
//! A fixed-capacity record store persisted as a single flat file:
//! - Fixed number of slots addressed directly by id
//! - Small records (id, name, email) with a per-field length limit
//! - Sparse, length-prefixed binary file format
//! - Fail-fast sessions: any error closes the file before it is reported
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          CLI                                 │
//! │           (create / get / set / delete / list)               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Session                               │
//! │              (file handle, load / save / close)              │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │      Store      │                │      Codec      │
//!   │ (capacity, len) │                │ (headers, rows) │
//!   └────────┬────────┘                └─────────────────┘
//!            │
//!            ▼
//!   ┌─────────────────┐
//!   │   Slot Table    │
//!   │ (Vec<Option<_>>)│
//!   └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod codec;
pub mod table;
pub mod store;
pub mod command;
pub mod session;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SlotDbError, Result};
pub use config::{Config, FieldPolicy};
pub use record::{Record, RowId};
pub use store::Store;
pub use command::{Command, Reply};
pub use session::{OpenMode, Session, SessionState};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of slotdb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
