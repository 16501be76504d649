//! Row encoding and decoding
//!
//! Row layout: `[RowHeader (12)][name: name_size][email: email_size]`

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, SlotDbError};
use crate::record::Record;

use super::RowHeader;

/// Encode a record: row header followed by the raw name and email bytes
pub fn encode_row(record: &Record) -> Result<Bytes> {
    let header = RowHeader {
        id: record.id(),
        name_size: field_size("name", record.name())?,
        email_size: field_size("email", record.email())?,
    };

    let mut buf = BytesMut::with_capacity(record.encoded_len());
    buf.put_slice(&header.encode()?);
    buf.put_slice(record.name().as_bytes());
    buf.put_slice(record.email().as_bytes());

    Ok(buf.freeze())
}

/// Decode one record from the front of `buf`, advancing past it
///
/// Declared field lengths are checked against the remaining bytes before
/// anything is allocated.
pub fn decode_row(buf: &mut &[u8]) -> Result<Record> {
    let header = RowHeader::decode(buf)?;

    if buf.remaining() < header.body_len() {
        return Err(SlotDbError::CorruptRecord(format!(
            "Row {}: declared {} body bytes, only {} remaining",
            header.id,
            header.body_len(),
            buf.remaining()
        )));
    }

    let name = read_text(buf, header.name_size as usize, header.id, "name")?;
    let email = read_text(buf, header.email_size as usize, header.id, "email")?;

    Ok(Record::new(header.id, name, email))
}

fn field_size(field: &'static str, value: &str) -> Result<u32> {
    u32::try_from(value.len()).map_err(|_| SlotDbError::FieldTooLong {
        field,
        len: value.len(),
        max: u32::MAX as usize,
    })
}

fn read_text(buf: &mut &[u8], len: usize, id: i32, field: &str) -> Result<String> {
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);

    String::from_utf8(bytes).map_err(|e| {
        SlotDbError::CorruptRecord(format!("Row {}: {} is not valid UTF-8: {}", id, field, e))
    })
}
