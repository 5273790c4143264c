//! Literal-to-bytes encoding for CQL partition-key columns.
//!
//! Every native type serializes the way Cassandra's own type serializers do,
//! so the resulting key bytes hash to the same token the cluster assigns.

use num_bigint::BigInt;
use ringscan_core::{
    schema::{CqlField, CqlType},
    token::{KeyEncodingError, KeyEncodingReason},
};
use std::{net::IpAddr, str::FromStr};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// Largest single component a composite key can carry (u16 length prefix).
pub const MAX_COMPONENT_LEN: usize = u16::MAX as usize;

/// Offset applied to day counts by Cassandra's `date` type.
const DATE_EPOCH_OFFSET: i64 = 1 << 31;

/// Encode one textual literal for `field` into its native byte form.
pub fn encode_literal(field: &CqlField, value: &str) -> Result<Vec<u8>, KeyEncodingError> {
    let fail = |reason| KeyEncodingError::new(field.name.clone(), value, reason);
    let invalid = || {
        fail(KeyEncodingReason::InvalidLiteral {
            cql_type: field.cql_type.to_string(),
        })
    };
    let out_of_range = || {
        fail(KeyEncodingReason::OutOfRange {
            cql_type: field.cql_type.to_string(),
        })
    };

    let bytes = match &field.cql_type {
        CqlType::Ascii => {
            if !value.is_ascii() {
                return Err(invalid());
            }
            value.as_bytes().to_vec()
        }
        CqlType::Text | CqlType::VarChar => value.as_bytes().to_vec(),
        CqlType::Boolean => match value.to_ascii_lowercase().as_str() {
            "true" => vec![1],
            "false" => vec![0],
            _ => return Err(invalid()),
        },
        CqlType::TinyInt => {
            let v = parse_integer(value).ok_or_else(invalid)?;
            i8::try_from(v).map_err(|_| out_of_range())?.to_be_bytes().to_vec()
        }
        CqlType::SmallInt => {
            let v = parse_integer(value).ok_or_else(invalid)?;
            i16::try_from(v).map_err(|_| out_of_range())?.to_be_bytes().to_vec()
        }
        CqlType::Int => {
            let v = parse_integer(value).ok_or_else(invalid)?;
            i32::try_from(v).map_err(|_| out_of_range())?.to_be_bytes().to_vec()
        }
        CqlType::BigInt | CqlType::Counter => {
            let v = parse_integer(value).ok_or_else(invalid)?;
            i64::try_from(v).map_err(|_| out_of_range())?.to_be_bytes().to_vec()
        }
        CqlType::VarInt => BigInt::from_str(value.trim())
            .map_err(|_| invalid())?
            .to_signed_bytes_be(),
        CqlType::Float => {
            let v = f32::from_str(value.trim()).map_err(|_| invalid())?;
            v.to_bits().to_be_bytes().to_vec()
        }
        CqlType::Double => {
            let v = f64::from_str(value.trim()).map_err(|_| invalid())?;
            v.to_bits().to_be_bytes().to_vec()
        }
        CqlType::Timestamp => parse_timestamp_millis(value)
            .ok_or_else(invalid)?
            .to_be_bytes()
            .to_vec(),
        CqlType::Date => {
            let raw = match parse_date(value).ok_or_else(invalid)? {
                DateLiteral::Raw(raw) => u32::try_from(raw).map_err(|_| out_of_range())?,
                DateLiteral::Days(days) => days
                    .checked_add(DATE_EPOCH_OFFSET)
                    .and_then(|shifted| u32::try_from(shifted).ok())
                    .ok_or_else(out_of_range)?,
            };
            raw.to_be_bytes().to_vec()
        }
        CqlType::Uuid => parse_uuid(value).ok_or_else(invalid)?.to_vec(),
        CqlType::TimeUuid => {
            let uuid = parse_uuid(value).ok_or_else(invalid)?;
            // version 1 only
            if uuid[6] >> 4 != 1 {
                return Err(invalid());
            }
            uuid.to_vec()
        }
        CqlType::Blob => parse_blob(value).ok_or_else(invalid)?,
        CqlType::Inet => match IpAddr::from_str(value.trim()).map_err(|_| invalid())? {
            IpAddr::V4(addr) => addr.octets().to_vec(),
            IpAddr::V6(addr) => addr.octets().to_vec(),
        },
        CqlType::Other(name) => {
            return Err(fail(KeyEncodingReason::UnsupportedType {
                cql_type: name.clone(),
            }));
        }
    };

    Ok(bytes)
}

/// Serialize encoded components into a partition key.
///
/// A single component is the key itself. Several components use the
/// composite layout: per component a big-endian u16 length, the bytes, and
/// a zero end-of-component byte.
pub fn compose_key(
    components: &[(&CqlField, &str, Vec<u8>)],
) -> Result<Vec<u8>, KeyEncodingError> {
    if let [(_, _, bytes)] = components {
        return Ok(bytes.clone());
    }

    let capacity = components.iter().map(|(_, _, bytes)| bytes.len() + 3).sum();
    let mut key = Vec::with_capacity(capacity);
    for (field, value, bytes) in components {
        let len = u16::try_from(bytes.len()).map_err(|_| {
            KeyEncodingError::new(
                field.name.clone(),
                *value,
                KeyEncodingReason::ComponentTooLarge {
                    len: bytes.len(),
                    max: MAX_COMPONENT_LEN,
                },
            )
        })?;
        key.extend_from_slice(&len.to_be_bytes());
        key.extend_from_slice(bytes);
        key.push(0);
    }

    Ok(key)
}

//
// Literal parsers
//

// Integers also accept a float rendering with an all-zero fraction ("3.0").
fn parse_integer(value: &str) -> Option<i128> {
    let value = value.trim();
    if let Ok(v) = i128::from_str(value) {
        return Some(v);
    }

    let (whole, fraction) = value.split_once('.')?;
    if fraction.is_empty() || !fraction.bytes().all(|b| b == b'0') {
        return None;
    }

    i128::from_str(whole).ok()
}

fn parse_timestamp_millis(value: &str) -> Option<i64> {
    let value = value.trim();
    if let Ok(millis) = i64::from_str(value) {
        return Some(millis);
    }

    let nanos = if let Ok(dt) = OffsetDateTime::parse(value, &Rfc3339) {
        dt.unix_timestamp_nanos()
    } else if let Ok(dt) = PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ) {
        dt.assume_utc().unix_timestamp_nanos()
    } else if let Ok(dt) = PrimitiveDateTime::parse(
        value,
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    ) {
        dt.assume_utc().unix_timestamp_nanos()
    } else {
        let date = Date::parse(value, format_description!("[year]-[month]-[day]")).ok()?;
        date.midnight().assume_utc().unix_timestamp_nanos()
    };

    i64::try_from(nanos.div_euclid(1_000_000)).ok()
}

///
/// DateLiteral
///
/// An integer `date` literal is the raw unsigned value, epoch at 2^31;
/// `yyyy-mm-dd` is a day count relative to 1970-01-01.
///

enum DateLiteral {
    Raw(i128),
    Days(i64),
}

fn parse_date(value: &str) -> Option<DateLiteral> {
    let value = value.trim();
    let digits = value.strip_prefix('-').unwrap_or(value);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        // too many digits for i128 is still out of range, not malformed
        return Some(DateLiteral::Raw(i128::from_str(value).unwrap_or(i128::MAX)));
    }

    let date = Date::parse(value, format_description!("[year]-[month]-[day]")).ok()?;
    let seconds = date.midnight().assume_utc().unix_timestamp();

    Some(DateLiteral::Days(seconds.div_euclid(86_400)))
}

fn parse_uuid(value: &str) -> Option<[u8; 16]> {
    let value = value.trim();
    let hex: String = match value.len() {
        36 => {
            let groups: Vec<&str> = value.split('-').collect();
            let lens: Vec<usize> = groups.iter().map(|group| group.len()).collect();
            if lens != [8, 4, 4, 4, 12] {
                return None;
            }
            groups.concat()
        }
        32 => value.to_string(),
        _ => return None,
    };

    decode_hex(&hex)?.try_into().ok()
}

fn parse_blob(value: &str) -> Option<Vec<u8>> {
    let value = value.trim();
    let hex = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))?;

    decode_hex(hex)
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }

    hex.as_bytes()
        .chunks(2)
        .map(|pair| {
            let high = char::from(pair[0]).to_digit(16)?;
            let low = char::from(pair[1]).to_digit(16)?;
            u8::try_from((high << 4) | low).ok()
        })
        .collect()
}

///
/// TESTS
///
