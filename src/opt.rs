//! Optional scalar helpers.
//!
//! Record types that distinguish "unset" from a zero value carry
//! `Option<T>` fields. These helpers read better than `Some(x.into())` at
//! call sites that fill such records from literals.

use chrono::{DateTime, Utc};

pub fn int64(v: i64) -> Option<i64> {
    Some(v)
}

pub fn string(v: impl Into<String>) -> Option<String> {
    Some(v.into())
}

pub fn uint32(v: u32) -> Option<u32> {
    Some(v)
}

pub fn int32(v: i32) -> Option<i32> {
    Some(v)
}

pub fn int8(v: i8) -> Option<i8> {
    Some(v)
}

pub fn int(v: isize) -> Option<isize> {
    Some(v)
}

pub fn boolean(v: bool) -> Option<bool> {
    Some(v)
}

pub fn time(v: DateTime<Utc>) -> Option<DateTime<Utc>> {
    Some(v)
}

/// Current wall-clock time.
pub fn now() -> Option<DateTime<Utc>> {
    Some(Utc::now())
}
