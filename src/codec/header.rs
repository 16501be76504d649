//! File and row headers
//!
//! Both headers are plain fixed-width structs serialized with bincode's
//! default (fixed-int, little-endian) encoding.

use bytes::Buf;
use serde::{Deserialize, Serialize};

use crate::config::MAX_ROWS_LIMIT;
use crate::error::{Result, SlotDbError};

use super::{FILE_HEADER_SIZE, ROW_HEADER_SIZE};

/// Header at the start of every database file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHeader {
    pub max_data: i32,
    pub max_rows: i32,
    pub current_rows: i32,
}

impl FileHeader {
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| SlotDbError::Serialization(e.to_string()))
    }

    /// Decode a header from the front of `buf`, advancing past it
    pub fn decode(buf: &mut &[u8]) -> Result<Self> {
        if buf.remaining() < FILE_HEADER_SIZE {
            return Err(SlotDbError::CorruptRecord(format!(
                "Truncated file header: expected {} bytes, got {}",
                FILE_HEADER_SIZE,
                buf.remaining()
            )));
        }

        let header: Self = bincode::deserialize(&buf[..FILE_HEADER_SIZE])
            .map_err(|e| SlotDbError::CorruptRecord(format!("Bad file header: {}", e)))?;
        buf.advance(FILE_HEADER_SIZE);

        Ok(header)
    }

    /// Check the header describes a usable table
    pub fn validate(&self) -> Result<()> {
        if self.max_data <= 0 {
            return Err(SlotDbError::CorruptRecord(format!(
                "Invalid max_data in header: {}",
                self.max_data
            )));
        }
        if self.max_rows <= 0 || self.max_rows > MAX_ROWS_LIMIT {
            return Err(SlotDbError::CorruptRecord(format!(
                "Invalid max_rows in header: {} (limit {})",
                self.max_rows, MAX_ROWS_LIMIT
            )));
        }
        if self.current_rows < 0 || self.current_rows > self.max_rows {
            return Err(SlotDbError::CorruptRecord(format!(
                "Invalid current_rows in header: {} (max_rows {})",
                self.current_rows, self.max_rows
            )));
        }
        Ok(())
    }
}

/// Header preceding each serialized row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowHeader {
    pub id: i32,
    pub name_size: u32,
    pub email_size: u32,
}

impl RowHeader {
    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| SlotDbError::Serialization(e.to_string()))
    }

    /// Decode a row header from the front of `buf`, advancing past it
    pub fn decode(buf: &mut &[u8]) -> Result<Self> {
        if buf.remaining() < ROW_HEADER_SIZE {
            return Err(SlotDbError::CorruptRecord(format!(
                "Truncated row header: expected {} bytes, got {}",
                ROW_HEADER_SIZE,
                buf.remaining()
            )));
        }

        let header: Self = bincode::deserialize(&buf[..ROW_HEADER_SIZE])
            .map_err(|e| SlotDbError::CorruptRecord(format!("Bad row header: {}", e)))?;
        buf.advance(ROW_HEADER_SIZE);

        Ok(header)
    }

    /// Bytes occupied by the row body following this header
    pub fn body_len(&self) -> usize {
        self.name_size as usize + self.email_size as usize
    }
}
