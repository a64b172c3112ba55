//! Length-prefixed binary codec for cached payloads.
//!
//! A blob is a sequence of frames:
//!
//! ```text
//! +-----------+-----------+------------------+
//! | tag (u32) | len (u32) | body (len bytes) |
//! +-----------+-----------+------------------+
//! ```
//!
//! Integers are big-endian. `tag` is the payload type's [`Payload::SCHEMA_TAG`]
//! and the body is the `bincode` encoding of one value. A single value is
//! exactly one frame; a list is zero or more frames back to back, so the
//! empty list encodes to an empty blob.

use bincode::Options;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::error::{CacheError, DecodeError};

/// Frame tag used by payload types that do not override it.
pub const DEFAULT_SCHEMA_TAG: u32 = 114_514;

/// Largest frame body accepted by the decoder.
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

const FRAME_HEADER_LEN: usize = 8;

const SUCCESS: u8 = 0;
const FAILURE: u8 = 1;

/// A value that can be stored in a cache entry.
///
/// Bump `SCHEMA_TAG` when the serialized shape of an implementor changes;
/// entries written with the old tag then decode as a miss.
pub trait Payload: Serialize + DeserializeOwned {
    const SCHEMA_TAG: u32 = DEFAULT_SCHEMA_TAG;
}

/// Server responses that come in a success or a failure shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<S, F> {
    Success(S),
    Failure(F),
}

/// Discriminant of an encoded [`Outcome`], readable without decoding the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Failure,
}

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(MAX_FRAME_LEN as u64)
        .reject_trailing_bytes()
}

/// Encode a single value as one frame.
pub fn encode<T: Payload>(value: &T) -> Result<Bytes, CacheError> {
    let body = serialize_body(value)?;
    let mut buf = BytesMut::with_capacity(FRAME_HEADER_LEN + body.len());
    put_frame(&mut buf, T::SCHEMA_TAG, &body)?;
    Ok(buf.freeze())
}

/// Decode a blob produced by [`encode`].
pub fn decode<T: Payload>(mut blob: &[u8]) -> Result<T, DecodeError> {
    let body = next_frame(&mut blob, T::SCHEMA_TAG)?;
    if blob.has_remaining() {
        return Err(DecodeError::TrailingBytes);
    }
    deserialize_body(body)
}

/// Encode an ordered list of values, one frame per element.
pub fn encode_list<T: Payload>(values: &[T]) -> Result<Bytes, CacheError> {
    let mut buf = BytesMut::new();
    for value in values {
        let body = serialize_body(value)?;
        put_frame(&mut buf, T::SCHEMA_TAG, &body)?;
    }
    Ok(buf.freeze())
}

/// Decode a blob produced by [`encode_list`]. All-or-nothing.
pub fn decode_list<T: Payload>(mut blob: &[u8]) -> Result<Vec<T>, DecodeError> {
    let mut values = Vec::new();
    while blob.has_remaining() {
        let body = next_frame(&mut blob, T::SCHEMA_TAG)?;
        values.push(deserialize_body(body)?);
    }
    Ok(values)
}

/// Encode an [`Outcome`] as one frame tagged with the success type's schema.
///
/// The frame body starts with a one-byte discriminant followed by the
/// encoded variant.
pub fn encode_outcome<S: Payload, F: Payload>(outcome: &Outcome<S, F>) -> Result<Bytes, CacheError> {
    let (discriminant, encoded) = match outcome {
        Outcome::Success(value) => (SUCCESS, serialize_body(value)?),
        Outcome::Failure(value) => (FAILURE, serialize_body(value)?),
    };

    let mut body = Vec::with_capacity(1 + encoded.len());
    body.push(discriminant);
    body.extend_from_slice(&encoded);

    let mut buf = BytesMut::with_capacity(FRAME_HEADER_LEN + body.len());
    put_frame(&mut buf, S::SCHEMA_TAG, &body)?;
    Ok(buf.freeze())
}

/// Read the discriminant of an encoded [`Outcome`] without decoding it.
pub fn peek_outcome<S: Payload>(mut blob: &[u8]) -> Result<OutcomeKind, DecodeError> {
    let body = next_frame(&mut blob, S::SCHEMA_TAG)?;
    let (kind, _) = split_discriminant(body)?;
    Ok(kind)
}

/// Decode an [`Outcome`]: peek the discriminant, then decode the matching variant.
pub fn decode_outcome<S: Payload, F: Payload>(mut blob: &[u8]) -> Result<Outcome<S, F>, DecodeError> {
    let body = next_frame(&mut blob, S::SCHEMA_TAG)?;
    if blob.has_remaining() {
        return Err(DecodeError::TrailingBytes);
    }

    match split_discriminant(body)? {
        (OutcomeKind::Success, rest) => deserialize_body(rest).map(Outcome::Success),
        (OutcomeKind::Failure, rest) => deserialize_body(rest).map(Outcome::Failure),
    }
}

fn split_discriminant(body: &[u8]) -> Result<(OutcomeKind, &[u8]), DecodeError> {
    let (&discriminant, rest) = body.split_first().ok_or(DecodeError::Truncated)?;
    let kind = match discriminant {
        SUCCESS => OutcomeKind::Success,
        FAILURE => OutcomeKind::Failure,
        other => return Err(DecodeError::UnknownVariant(other)),
    };
    Ok((kind, rest))
}

fn serialize_body<T: Serialize>(value: &T) -> Result<Vec<u8>, CacheError> {
    options()
        .serialize(value)
        .map_err(|e| CacheError::Encode(e.to_string()))
}

fn deserialize_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    options()
        .deserialize(body)
        .map_err(|e| DecodeError::Body(e.to_string()))
}

fn put_frame(buf: &mut BytesMut, tag: u32, body: &[u8]) -> Result<(), CacheError> {
    if body.len() > MAX_FRAME_LEN {
        return Err(CacheError::Encode(format!(
            "frame body of {} bytes exceeds the {} byte limit",
            body.len(),
            MAX_FRAME_LEN
        )));
    }
    buf.reserve(FRAME_HEADER_LEN + body.len());
    buf.put_u32(tag);
    buf.put_u32(body.len() as u32);
    buf.put_slice(body);
    Ok(())
}

fn next_frame<'a>(blob: &mut &'a [u8], expected_tag: u32) -> Result<&'a [u8], DecodeError> {
    if blob.remaining() < FRAME_HEADER_LEN {
        return Err(DecodeError::Truncated);
    }

    let tag = blob.get_u32();
    if tag != expected_tag {
        return Err(DecodeError::TagMismatch {
            expected: expected_tag,
            found: tag,
        });
    }

    let len = blob.get_u32() as usize;
    if len > MAX_FRAME_LEN {
        return Err(DecodeError::FrameTooLarge(len));
    }

    let rest: &'a [u8] = *blob;
    if rest.len() < len {
        return Err(DecodeError::Truncated);
    }
    let (body, tail) = rest.split_at(len);
    *blob = tail;
    Ok(body)
}
