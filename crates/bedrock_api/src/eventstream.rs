use std::collections::BTreeMap;

use crate::error::BedrockApiError;

/// Minimum size of a frame: prelude (12 bytes) plus trailing CRC (4 bytes).
const MIN_FRAME_LEN: usize = 16;
/// Upper bound on a single frame, to reject corrupt length preludes early.
const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

const HEADER_TYPE_BOOL_TRUE: u8 = 0;
const HEADER_TYPE_BOOL_FALSE: u8 = 1;
const HEADER_TYPE_BYTE: u8 = 2;
const HEADER_TYPE_I16: u8 = 3;
const HEADER_TYPE_I32: u8 = 4;
const HEADER_TYPE_I64: u8 = 5;
const HEADER_TYPE_BYTES: u8 = 6;
const HEADER_TYPE_STRING: u8 = 7;
const HEADER_TYPE_TIMESTAMP: u8 = 8;
const HEADER_TYPE_UUID: u8 = 9;

/// Decoded header value from a binary event stream frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    Bool(bool),
    Int(i64),
    Bytes(Vec<u8>),
    String(String),
    Timestamp(i64),
    Uuid([u8; 16]),
}

impl HeaderValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }
}

/// One decoded frame: headers plus raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStreamFrame {
    pub headers: BTreeMap<String, HeaderValue>,
    pub payload: Vec<u8>,
}

impl EventStreamFrame {
    #[must_use]
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(HeaderValue::as_str)
    }
}

/// Incremental parser for `application/vnd.amazon.eventstream` byte streams.
///
/// Frames are length-delimited: a 12-byte prelude (total length, headers
/// length, prelude CRC), the header block, the payload, and a trailing
/// message CRC. Declared lengths are validated; CRCs are not recomputed,
/// so corruption surfaces as a length or header decoding failure.
#[derive(Debug, Default)]
pub struct EventStreamParser {
    buffer: Vec<u8>,
}

impl EventStreamParser {
    /// Feed arbitrary bytes into the parser and drain complete frames.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<Vec<EventStreamFrame>, BedrockApiError> {
        self.buffer.extend_from_slice(bytes);
        let mut frames = Vec::new();

        loop {
            if self.buffer.len() < 12 {
                break;
            }

            let total_len = read_u32(&self.buffer, 0) as usize;
            let headers_len = read_u32(&self.buffer, 4) as usize;

            if !(MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&total_len)
                || headers_len + MIN_FRAME_LEN > total_len
            {
                return Err(BedrockApiError::MalformedFrame(format!(
                    "invalid prelude lengths (total: {total_len}, headers: {headers_len})"
                )));
            }

            if self.buffer.len() < total_len {
                break;
            }

            let headers = parse_headers(&self.buffer[12..12 + headers_len])?;
            let payload = self.buffer[12 + headers_len..total_len - 4].to_vec();
            self.buffer.drain(0..total_len);

            frames.push(EventStreamFrame { headers, payload });
        }

        Ok(frames)
    }

    #[must_use]
    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.is_empty()
    }
}

/// Encode a frame for tests and fixtures. CRC slots are zero-filled, which
/// the tolerant parser accepts.
#[must_use]
pub fn encode_frame(headers: &[(&str, HeaderValue)], payload: &[u8]) -> Vec<u8> {
    let mut header_block = Vec::new();
    for (name, value) in headers {
        header_block.push(name.len() as u8);
        header_block.extend_from_slice(name.as_bytes());
        match value {
            HeaderValue::Bool(true) => header_block.push(HEADER_TYPE_BOOL_TRUE),
            HeaderValue::Bool(false) => header_block.push(HEADER_TYPE_BOOL_FALSE),
            HeaderValue::Int(value) => {
                header_block.push(HEADER_TYPE_I64);
                header_block.extend_from_slice(&value.to_be_bytes());
            }
            HeaderValue::Bytes(value) => {
                header_block.push(HEADER_TYPE_BYTES);
                header_block.extend_from_slice(&(value.len() as u16).to_be_bytes());
                header_block.extend_from_slice(value);
            }
            HeaderValue::String(value) => {
                header_block.push(HEADER_TYPE_STRING);
                header_block.extend_from_slice(&(value.len() as u16).to_be_bytes());
                header_block.extend_from_slice(value.as_bytes());
            }
            HeaderValue::Timestamp(value) => {
                header_block.push(HEADER_TYPE_TIMESTAMP);
                header_block.extend_from_slice(&value.to_be_bytes());
            }
            HeaderValue::Uuid(value) => {
                header_block.push(HEADER_TYPE_UUID);
                header_block.extend_from_slice(value);
            }
        }
    }

    let total_len = 12 + header_block.len() + payload.len() + 4;
    let mut frame = Vec::with_capacity(total_len);
    frame.extend_from_slice(&(total_len as u32).to_be_bytes());
    frame.extend_from_slice(&(header_block.len() as u32).to_be_bytes());
    frame.extend_from_slice(&[0u8; 4]);
    frame.extend_from_slice(&header_block);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&[0u8; 4]);
    frame
}

fn parse_headers(block: &[u8]) -> Result<BTreeMap<String, HeaderValue>, BedrockApiError> {
    let mut headers = BTreeMap::new();
    let mut cursor = 0usize;

    while cursor < block.len() {
        let name_len = block[cursor] as usize;
        cursor += 1;
        let name = take(block, &mut cursor, name_len)?;
        let name = std::str::from_utf8(name)
            .map_err(|_| malformed("header name is not UTF-8"))?
            .to_owned();

        let value_type = *block.get(cursor).ok_or_else(|| malformed("truncated header type"))?;
        cursor += 1;

        let value = match value_type {
            HEADER_TYPE_BOOL_TRUE => HeaderValue::Bool(true),
            HEADER_TYPE_BOOL_FALSE => HeaderValue::Bool(false),
            HEADER_TYPE_BYTE => HeaderValue::Int(i64::from(take_fixed::<1>(block, &mut cursor)?[0] as i8)),
            HEADER_TYPE_I16 => {
                HeaderValue::Int(i64::from(i16::from_be_bytes(take_fixed(block, &mut cursor)?)))
            }
            HEADER_TYPE_I32 => {
                HeaderValue::Int(i64::from(i32::from_be_bytes(take_fixed(block, &mut cursor)?)))
            }
            HEADER_TYPE_I64 => {
                HeaderValue::Int(i64::from_be_bytes(take_fixed(block, &mut cursor)?))
            }
            HEADER_TYPE_BYTES => {
                let len = u16::from_be_bytes(take_fixed(block, &mut cursor)?) as usize;
                HeaderValue::Bytes(take(block, &mut cursor, len)?.to_vec())
            }
            HEADER_TYPE_STRING => {
                let len = u16::from_be_bytes(take_fixed(block, &mut cursor)?) as usize;
                let raw = take(block, &mut cursor, len)?;
                HeaderValue::String(
                    std::str::from_utf8(raw)
                        .map_err(|_| malformed("string header is not UTF-8"))?
                        .to_owned(),
                )
            }
            HEADER_TYPE_TIMESTAMP => {
                HeaderValue::Timestamp(i64::from_be_bytes(take_fixed(block, &mut cursor)?))
            }
            HEADER_TYPE_UUID => HeaderValue::Uuid(take_fixed(block, &mut cursor)?),
            unknown => {
                return Err(malformed(&format!("unknown header value type {unknown}")));
            }
        };

        headers.insert(name, value);
    }

    Ok(headers)
}

fn take<'a>(block: &'a [u8], cursor: &mut usize, len: usize) -> Result<&'a [u8], BedrockApiError> {
    let end = cursor
        .checked_add(len)
        .filter(|end| *end <= block.len())
        .ok_or_else(|| malformed("truncated header block"))?;
    let slice = &block[*cursor..end];
    *cursor = end;
    Ok(slice)
}

fn take_fixed<const N: usize>(
    block: &[u8],
    cursor: &mut usize,
) -> Result<[u8; N], BedrockApiError> {
    let slice = take(block, cursor, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(slice);
    Ok(out)
}

fn read_u32(buffer: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        buffer[offset],
        buffer[offset + 1],
        buffer[offset + 2],
        buffer[offset + 3],
    ])
}

fn malformed(message: &str) -> BedrockApiError {
    BedrockApiError::MalformedFrame(message.to_owned())
}
