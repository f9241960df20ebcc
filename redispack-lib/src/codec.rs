//! Conversion between typed values and the byte strings stored on the server.
//!
//! Values are packed with `bincode` using fixed-width integers and rejecting
//! trailing bytes. Decoding is strict enough that bytes written for one type
//! rarely decode as another, and whenever they fail to decode the caller
//! simply sees `None`.

use bincode::Options;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::type_name;
use tracing::trace;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode `value` into its canonical byte string.
///
/// # Errors
///
/// Only for values `bincode` cannot represent, e.g. a serde sequence whose
/// length is not known up front.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> crate::Result<Bytes> {
    Ok(options().serialize(value)?.into())
}

/// Decode `bytes` back into a `T`.
///
/// Returns `None` when the bytes are not a complete, valid encoding of `T`.
/// A missing entry and an undecodable one therefore look the same to callers.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    match options().deserialize(bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            trace!(target_type = type_name::<T>(), cause = %err, "undecodable value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Point {
        x: i32,
        y: i32,
        label: Option<String>,
    }

    #[test]
    fn values_survive_encoding() {
        let bytes = encode(&777_i32).unwrap();
        assert_eq!(decode::<i32>(&bytes), Some(777));

        let bytes = encode("Hello World!").unwrap();
        assert_eq!(decode::<String>(&bytes), Some("Hello World!".to_string()));

        let point = Point {
            x: -3,
            y: 4,
            label: Some("origin-ish".into()),
        };
        let bytes = encode(&point).unwrap();
        assert_eq!(decode::<Point>(&bytes), Some(point));

        let map: BTreeMap<u8, Vec<bool>> = [(1, vec![true]), (2, vec![])].into();
        let bytes = encode(&map).unwrap();
        assert_eq!(decode::<BTreeMap<u8, Vec<bool>>>(&bytes), Some(map));
    }

    #[test]
    fn str_and_string_share_an_encoding() {
        assert_eq!(encode("abc").unwrap(), encode(&"abc".to_string()).unwrap());
    }

    #[test]
    fn other_types_do_not_decode() {
        // the length prefix claims more bytes than there are
        assert_eq!(decode::<String>(&encode(&42_u64).unwrap()), None);
        // too short for the length prefix
        assert_eq!(decode::<String>(&encode(&7_i32).unwrap()), None);
        // trailing bytes left over
        assert_eq!(decode::<u64>(&encode("abc").unwrap()), None);
        assert_eq!(decode::<i32>(&encode(&1_i64).unwrap()), None);
    }

    #[test]
    fn garbage_does_not_decode() {
        assert_eq!(decode::<String>(b""), None);
        assert_eq!(decode::<u32>(b"not a number"), None);
        // valid length prefix, invalid UTF-8 payload
        assert_eq!(decode::<String>(&[2, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xfe]), None);
    }
}
