//! Codec Module
//!
//! Pure conversion between in-memory records and the on-disk byte layout.
//! Nothing here touches a file.
//!
//! ## File Format (sparse)
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ FileHeader (12 bytes)                                   │
//! │   max_data: i32 | max_rows: i32 | current_rows: i32     │
//! ├─────────────────────────────────────────────────────────┤
//! │ Row (repeated current_rows times, increasing id)        │
//! │   RowHeader (12 bytes)                                  │
//! │     id: i32 | name_size: u32 | email_size: u32          │
//! │   [name bytes][email bytes]                             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian on every host. Files written with
//! host-native integers on a big-endian machine are not readable.
//! Empty slots are not written.
//! Text is written without terminator or padding.

mod header;
mod row;

pub use header::{FileHeader, RowHeader};
pub use row::{decode_row, encode_row};

/// FileHeader size: max_data (4) + max_rows (4) + current_rows (4)
pub const FILE_HEADER_SIZE: usize = 12;

/// RowHeader size: id (4) + name_size (4) + email_size (4)
pub const ROW_HEADER_SIZE: usize = 12;
