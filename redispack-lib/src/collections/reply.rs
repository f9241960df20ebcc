//! Lenient readings of reply frames.

use crate::Frame;
use bytes::Bytes;
use tracing::warn;

fn unexpected(expected: &str, frame: &Frame) {
    warn!(expected, reply = %frame, "unexpected reply treated as no effect");
}

/// An integer reply of exactly `1`, as sent for "created" or "present".
pub(crate) fn is_one(frame: Frame) -> bool {
    integer(frame) == 1
}

/// An integer reply as a count, `0` for any other reply.
///
/// Counts are never negative, a negative integer also reads as `0`.
pub(crate) fn integer(frame: Frame) -> usize {
    match frame {
        Frame::Integer(n) if n < 0 => {
            unexpected("count", &Frame::Integer(n));
            0
        }
        Frame::Integer(n) => usize::try_from(n).unwrap_or(usize::MAX),
        other => {
            unexpected("integer", &other);
            0
        }
    }
}

/// The payload of a bulk reply. `Null` and anything else read as `None`.
pub(crate) fn bulk(frame: Frame) -> Option<Bytes> {
    match frame {
        Frame::Bulk(data) => Some(data),
        Frame::Null => None,
        other => {
            unexpected("bulk", &other);
            None
        }
    }
}

/// The bulk entries of an array reply, skipping entries of any other kind.
pub(crate) fn bulk_array(frame: Frame) -> Vec<Bytes> {
    match frame {
        Frame::Array(entries) => entries
            .into_iter()
            .filter_map(|entry| match entry {
                Frame::Bulk(data) => Some(data),
                _ => None,
            })
            .collect(),
        other => {
            unexpected("array", &other);
            vec![]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_and_counts() {
        assert!(is_one(Frame::Integer(1)));
        assert!(!is_one(Frame::Integer(0)));
        assert!(!is_one(Frame::Integer(2)));
        assert_eq!(integer(Frame::Integer(3)), 3);
    }

    #[test]
    fn negative_integer_is_no_count() {
        assert_eq!(integer(Frame::Integer(-1)), 0);
        assert!(!is_one(Frame::Integer(-1)));
    }

    #[test]
    fn error_replies_read_as_no_effect() {
        let wrong_type = Frame::Error("WRONGTYPE Operation against a key".into());

        assert!(!is_one(wrong_type.clone()));
        assert_eq!(integer(wrong_type.clone()), 0);
        assert_eq!(bulk(wrong_type.clone()), None);
        assert!(bulk_array(wrong_type).is_empty());
    }

    #[test]
    fn bulk_array_skips_other_entries() {
        let frame = Frame::Array(vec![
            Frame::Bulk(Bytes::from_static(b"a")),
            Frame::Null,
            Frame::Integer(1),
            Frame::Bulk(Bytes::from_static(b"b")),
        ]);

        assert_eq!(
            bulk_array(frame),
            vec![Bytes::from_static(b"a"), Bytes::from_static(b"b")]
        );
    }

    #[test]
    fn null_is_absent() {
        assert_eq!(bulk(Frame::Null), None);
        assert_eq!(bulk(Frame::Bulk(Bytes::from_static(b"v"))), Some(Bytes::from_static(b"v")));
    }
}
