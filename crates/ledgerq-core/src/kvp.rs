//! Hierarchical key-value store used for ad hoc persisted attributes.
//!
//! Frames are string-keyed maps of tagged values; a value can itself be a
//! frame, which is what path access walks through.

use crate::types::{Guid, Numeric, Timespec};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap, mem::discriminant};
use thiserror::Error as ThisError;

///
/// KvpError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum KvpError {
    #[error("key path must be non-empty")]
    EmptyPath,

    #[error("key path segment at index {index} is empty")]
    EmptySegment { index: usize },
}

///
/// KvpValue
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum KvpValue {
    Int64(i64),
    Double(f64),
    Numeric(Numeric),
    Text(String),
    Guid(Guid),
    Timespec(Timespec),
    Frame(KvpFrame),
}

impl KvpValue {
    /// Stable rank used for cross-variant ordering.
    #[must_use]
    const fn canonical_rank(&self) -> u8 {
        match self {
            Self::Int64(_) => 0,
            Self::Double(_) => 1,
            Self::Numeric(_) => 2,
            Self::Text(_) => 3,
            Self::Guid(_) => 4,
            Self::Timespec(_) => 5,
            Self::Frame(_) => 6,
        }
    }

    #[must_use]
    pub fn same_variant(left: &Self, right: &Self) -> bool {
        discriminant(left) == discriminant(right)
    }

    /// Total canonical comparator.
    ///
    /// Ordering rules:
    /// 1. Canonical variant rank
    /// 2. Variant-specific comparison for same-ranked values
    #[must_use]
    pub fn canonical_cmp(left: &Self, right: &Self) -> Ordering {
        let rank = left.canonical_rank().cmp(&right.canonical_rank());
        if rank != Ordering::Equal {
            return rank;
        }

        match (left, right) {
            (Self::Int64(a), Self::Int64(b)) => a.cmp(b),
            (Self::Double(a), Self::Double(b)) => a.total_cmp(b),
            (Self::Numeric(a), Self::Numeric(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Guid(a), Self::Guid(b)) => a.cmp(b),
            (Self::Timespec(a), Self::Timespec(b)) => a.cmp(b),
            (Self::Frame(a), Self::Frame(b)) => canonical_cmp_frame(a, b),
            _ => Ordering::Equal,
        }
    }
}

fn canonical_cmp_frame(left: &KvpFrame, right: &KvpFrame) -> Ordering {
    for ((left_key, left_value), (right_key, right_value)) in
        left.entries.iter().zip(right.entries.iter())
    {
        let key_cmp = left_key.cmp(right_key);
        if key_cmp != Ordering::Equal {
            return key_cmp;
        }

        let value_cmp = KvpValue::canonical_cmp(left_value, right_value);
        if value_cmp != Ordering::Equal {
            return value_cmp;
        }
    }

    left.entries.len().cmp(&right.entries.len())
}

///
/// KvpFrame
///
/// Entries are kept in key order so iteration and comparison are
/// deterministic.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct KvpFrame {
    entries: BTreeMap<String, KvpValue>,
}

impl KvpFrame {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&KvpValue> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: KvpValue) {
        self.entries.insert(key.into(), value);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Walk a key path through nested frames.
    ///
    /// Returns `None` when any segment is absent or an intermediate value
    /// is not a frame.
    #[must_use]
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&KvpValue> {
        let (last, frames) = path.split_last()?;

        let mut frame = self;
        for segment in frames {
            match frame.get(segment.as_ref()) {
                Some(KvpValue::Frame(inner)) => frame = inner,
                _ => return None,
            }
        }

        frame.get(last.as_ref())
    }

    /// Store a value at a key path, creating intermediate frames as needed.
    /// A non-frame intermediate value is replaced by a fresh frame.
    pub fn set_path<S: AsRef<str>>(&mut self, path: &[S], value: KvpValue) -> Result<(), KvpError> {
        let (last, frames) = path.split_last().ok_or(KvpError::EmptyPath)?;
        for (index, segment) in path.iter().enumerate() {
            if segment.as_ref().is_empty() {
                return Err(KvpError::EmptySegment { index });
            }
        }

        let mut frame = self;
        for segment in frames {
            let slot = frame
                .entries
                .entry(segment.as_ref().to_string())
                .or_insert_with(|| KvpValue::Frame(Self::new()));
            if !matches!(slot, KvpValue::Frame(_)) {
                *slot = KvpValue::Frame(Self::new());
            }

            match slot {
                KvpValue::Frame(inner) => frame = inner,
                _ => unreachable!("slot was just normalized to a frame"),
            }
        }

        frame.set(last.as_ref(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_round_trip() {
        let mut frame = KvpFrame::new();
        frame
            .set_path(&["outer", "inner", "leaf"], KvpValue::Int64(7))
            .unwrap();

        assert_eq!(
            frame.get_path(&["outer", "inner", "leaf"]),
            Some(&KvpValue::Int64(7))
        );
        assert_eq!(frame.get_path(&["outer", "missing"]), None);
    }

    #[test]
    fn non_frame_intermediate_blocks_lookup() {
        let mut frame = KvpFrame::new();
        frame.set("outer", KvpValue::Int64(1));

        assert_eq!(frame.get_path(&["outer", "leaf"]), None);
    }

    #[test]
    fn set_path_replaces_non_frame_intermediate() {
        let mut frame = KvpFrame::new();
        frame.set("outer", KvpValue::Int64(1));
        frame
            .set_path(&["outer", "leaf"], KvpValue::Text("x".into()))
            .unwrap();

        assert_eq!(
            frame.get_path(&["outer", "leaf"]),
            Some(&KvpValue::Text("x".into()))
        );
    }

    #[test]
    fn rejects_bad_paths() {
        let mut frame = KvpFrame::new();
        let empty: [&str; 0] = [];

        assert_eq!(
            frame.set_path(&empty, KvpValue::Int64(0)),
            Err(KvpError::EmptyPath)
        );
        assert_eq!(
            frame.set_path(&["a", ""], KvpValue::Int64(0)),
            Err(KvpError::EmptySegment { index: 1 })
        );
    }

    #[test]
    fn canonical_cmp_ranks_variants_before_values() {
        let int = KvpValue::Int64(999);
        let text = KvpValue::Text("a".into());

        assert_eq!(KvpValue::canonical_cmp(&int, &text), Ordering::Less);
        assert_eq!(
            KvpValue::canonical_cmp(&KvpValue::Int64(1), &KvpValue::Int64(2)),
            Ordering::Less
        );
    }

    #[test]
    fn frames_compare_entrywise() {
        let mut a = KvpFrame::new();
        a.set("k", KvpValue::Int64(1));
        let mut b = KvpFrame::new();
        b.set("k", KvpValue::Int64(2));

        assert_eq!(
            KvpValue::canonical_cmp(&KvpValue::Frame(a), &KvpValue::Frame(b)),
            Ordering::Less
        );
    }
}
