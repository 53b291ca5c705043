use crate::{
    kvp::KvpValue,
    query::registry::{CoreTypeName, names},
    types::{Guid, Numeric, Timespec},
};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, ptr};
use thiserror::Error as ThisError;

///
/// CompareHow
///
/// The six relational operators a predicate can carry. Which of them a
/// given core type accepts is enforced by the predicate constructors.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CompareHow {
    Lt,
    Lte,
    Equal,
    Gt,
    Gte,
    Neq,
}

impl CompareHow {
    /// Apply the operator to an already-computed ordering.
    #[must_use]
    pub fn ord_matches(self, ordering: Ordering) -> bool {
        match self {
            Self::Lt => ordering == Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
            Self::Equal => ordering == Ordering::Equal,
            Self::Gt => ordering == Ordering::Greater,
            Self::Gte => ordering != Ordering::Less,
            Self::Neq => ordering != Ordering::Equal,
        }
    }

    #[must_use]
    pub fn is_equality(self) -> bool {
        matches!(self, Self::Equal | Self::Neq)
    }
}

///
/// TextMode
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TextMode {
    Cs, // case-sensitive
    Ci, // case-insensitive
}

///
/// DateMatch
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum DateMatch {
    /// Compare full (secs, nanos) instants.
    Normal,
    /// Truncate both operands to the canonical day boundary first.
    Rounded,
}

///
/// NumericMatch
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum NumericMatch {
    /// No sign filter.
    Any,
    /// Only non-negative object values can match.
    Credit,
    /// Only non-positive object values can match.
    Debit,
}

///
/// GuidMatch
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum GuidMatch {
    /// The object's guid is in the predicate list.
    Any,
    /// The object's guid is not in the predicate list.
    None,
    /// Every predicate guid appears in the object's guid list.
    All,
    /// The object carries no guid at all.
    Null,
}

///
/// CharMatch
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CharMatch {
    /// The object's char is a member of the predicate set.
    Any,
    /// The object's char is not a member of the predicate set.
    None,
}

///
/// StringMatcher
///
/// The text comparison engine of a string predicate, fixed at
/// construction: plain substring search or a compiled regex (with the
/// case-insensitive flag already baked in).
///

#[derive(Clone, Debug)]
pub enum StringMatcher {
    Substring(String),
    Regex(Regex),
}

impl StringMatcher {
    #[must_use]
    pub fn pattern(&self) -> &str {
        match self {
            Self::Substring(text) => text,
            Self::Regex(regex) => regex.as_str(),
        }
    }
}

// Matcher equality is pattern equality; two regexes compiled from the same
// pattern behave identically.
impl PartialEq for StringMatcher {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Substring(a), Self::Substring(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

///
/// PredicateError
///

#[derive(Debug, ThisError)]
pub enum PredicateError {
    #[error("operator {how:?} is not valid for core type '{type_name}'")]
    UnsupportedHow {
        type_name: CoreTypeName,
        how: CompareHow,
    },

    #[error("match string must be non-empty")]
    EmptyMatchString,

    #[error("invalid match pattern: {0}")]
    BadRegex(#[from] regex::Error),
}

///
/// PredicatePayload
///
/// One variant per core type; the payload owns its comparison operands
/// outright (guid lists, kvp paths and values), so `Clone` is the deep
/// copy and `Drop` the type-aware teardown.
///

#[derive(Clone, Debug, PartialEq)]
pub enum PredicatePayload {
    String {
        mode: TextMode,
        matcher: StringMatcher,
    },
    Date {
        mode: DateMatch,
        when: Timespec,
    },
    Numeric {
        mode: NumericMatch,
        amount: Numeric,
    },
    Guid {
        mode: GuidMatch,
        guids: Vec<Guid>,
    },
    Int64(i64),
    Double(f64),
    Boolean(bool),
    Char {
        mode: CharMatch,
        set: String,
    },
    Kvp {
        path: Vec<String>,
        value: KvpValue,
    },
}

///
/// Predicate
///
/// A comparison operand: operator plus type-specific payload, tagged with
/// the core type name it dispatches through.
///

#[derive(Clone, Debug, PartialEq)]
pub struct Predicate {
    type_name: CoreTypeName,
    how: CompareHow,
    payload: PredicatePayload,
}

impl Predicate {
    /// String predicate: substring or regex search. Only `Equal`/`Neq`
    /// make sense for text matching; other operators are rejected.
    pub fn string(
        how: CompareHow,
        mode: TextMode,
        text: &str,
        use_regex: bool,
    ) -> Result<Self, PredicateError> {
        if text.is_empty() {
            return Err(PredicateError::EmptyMatchString);
        }
        if !how.is_equality() {
            return Err(PredicateError::UnsupportedHow {
                type_name: names::STRING,
                how,
            });
        }

        let matcher = if use_regex {
            StringMatcher::Regex(
                RegexBuilder::new(text)
                    .case_insensitive(mode == TextMode::Ci)
                    .build()?,
            )
        } else {
            StringMatcher::Substring(text.to_string())
        };

        Ok(Self {
            type_name: names::STRING,
            how,
            payload: PredicatePayload::String { mode, matcher },
        })
    }

    #[must_use]
    pub const fn date(how: CompareHow, mode: DateMatch, when: Timespec) -> Self {
        Self {
            type_name: names::DATE,
            how,
            payload: PredicatePayload::Date { mode, when },
        }
    }

    #[must_use]
    pub const fn numeric(how: CompareHow, mode: NumericMatch, amount: Numeric) -> Self {
        Self {
            type_name: names::NUMERIC,
            how,
            payload: PredicatePayload::Numeric { mode, amount },
        }
    }

    /// Same payload and semantics as [`numeric`](Self::numeric), registered
    /// under the debit/credit type name.
    #[must_use]
    pub const fn debcred(how: CompareHow, mode: NumericMatch, amount: Numeric) -> Self {
        Self {
            type_name: names::DEBCRED,
            how,
            payload: PredicatePayload::Numeric { mode, amount },
        }
    }

    /// Guid predicate; the operator is fixed to `Equal`, the match mode
    /// carries the set semantics.
    #[must_use]
    pub fn guid(mode: GuidMatch, guids: Vec<Guid>) -> Self {
        Self {
            type_name: names::GUID,
            how: CompareHow::Equal,
            payload: PredicatePayload::Guid { mode, guids },
        }
    }

    #[must_use]
    pub const fn int64(how: CompareHow, value: i64) -> Self {
        Self {
            type_name: names::INT64,
            how,
            payload: PredicatePayload::Int64(value),
        }
    }

    #[must_use]
    pub const fn double(how: CompareHow, value: f64) -> Self {
        Self {
            type_name: names::DOUBLE,
            how,
            payload: PredicatePayload::Double(value),
        }
    }

    /// Boolean predicate; only `Equal`/`Neq` are accepted.
    pub fn boolean(how: CompareHow, value: bool) -> Result<Self, PredicateError> {
        if !how.is_equality() {
            return Err(PredicateError::UnsupportedHow {
                type_name: names::BOOLEAN,
                how,
            });
        }

        Ok(Self {
            type_name: names::BOOLEAN,
            how,
            payload: PredicatePayload::Boolean(value),
        })
    }

    /// Character-set predicate; the operator is fixed to `Equal`, the
    /// match mode selects membership or non-membership.
    pub fn character(mode: CharMatch, set: impl Into<String>) -> Self {
        Self {
            type_name: names::CHAR,
            how: CompareHow::Equal,
            payload: PredicatePayload::Char {
                mode,
                set: set.into(),
            },
        }
    }

    #[must_use]
    pub fn kvp(how: CompareHow, path: Vec<String>, value: KvpValue) -> Self {
        Self {
            type_name: names::KVP,
            how,
            payload: PredicatePayload::Kvp { path, value },
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> CoreTypeName {
        self.type_name
    }

    #[must_use]
    pub const fn how(&self) -> CompareHow {
        self.how
    }

    #[must_use]
    pub const fn payload(&self) -> &PredicatePayload {
        &self.payload
    }

    /// Structural equivalence for diffing two optional predicates.
    ///
    /// Identity short-circuits to true; present-vs-absent is false;
    /// otherwise the operator, type name, and payload must all agree.
    #[must_use]
    pub fn equivalent(left: Option<&Self>, right: Option<&Self>) -> bool {
        match (left, right) {
            (None, None) => true,
            (Some(l), Some(r)) => {
                ptr::eq(l, r)
                    || (l.how == r.how && l.type_name == r.type_name && l.payload == r.payload)
            }
            _ => false,
        }
    }
}
