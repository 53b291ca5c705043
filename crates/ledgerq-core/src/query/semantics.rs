//! Module: query::semantics
//! Responsibility: the built-in core types and their match/compare/stringify
//! behavior.
//! Does not own: predicate construction or registry lifecycle.
//! Boundary: a malformed evaluation (payload and value shapes disagree)
//! logs a warning and does not match; it never fails the caller.

use crate::{
    kvp::KvpValue,
    query::{
        predicate::{
            CharMatch, CompareHow, DateMatch, GuidMatch, NumericMatch, Predicate,
            PredicatePayload, StringMatcher, TextMode,
        },
        registry::{CompareOptions, CoreType, CoreTypeName, FieldValue, names},
    },
    types::{Numeric, Timespec},
};
use std::cmp::Ordering;

/// Magnitude tolerance for numeric equality matching: two amounts are
/// "equal" when their absolute values agree to within 1/10000.
const EQUAL_EPSILON: Numeric = Numeric::from_raw(1, 10_000);

/// The built-in core types, in registration order.
pub(crate) fn builtin_types() -> Vec<Box<dyn CoreType>> {
    vec![
        Box::new(StringType),
        Box::new(DateType),
        Box::new(NumericType::numeric()),
        Box::new(NumericType::debcred()),
        Box::new(GuidType),
        Box::new(Int64Type),
        Box::new(DoubleType),
        Box::new(BooleanType),
        Box::new(CharType),
        Box::new(KvpType),
    ]
}

fn mismatch(type_name: CoreTypeName, value: &FieldValue) -> bool {
    tracing::warn!(
        core_type = type_name,
        ?value,
        "predicate payload and field value disagree; treating as no match"
    );
    false
}

fn unsupported_how(type_name: CoreTypeName, how: CompareHow) -> bool {
    tracing::warn!(
        core_type = type_name,
        ?how,
        "operator is not meaningful for this core type; treating as no match"
    );
    false
}

fn casefold(input: &str) -> String {
    if input.is_ascii() {
        return input.to_ascii_lowercase();
    }

    input.to_lowercase()
}

///
/// StringType
///

struct StringType;

impl CoreType for StringType {
    fn name(&self) -> CoreTypeName {
        names::STRING
    }

    fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool {
        let PredicatePayload::String { mode, matcher } = predicate.payload() else {
            return mismatch(self.name(), value);
        };
        let FieldValue::Text(text) = value else {
            return mismatch(self.name(), value);
        };

        let found = match matcher {
            StringMatcher::Substring(needle) => match mode {
                TextMode::Cs => text.contains(needle),
                TextMode::Ci => casefold(text).contains(&casefold(needle)),
            },
            // Case-insensitivity is compiled into the regex.
            StringMatcher::Regex(regex) => regex.is_match(text),
        };

        match predicate.how() {
            CompareHow::Equal => found,
            CompareHow::Neq => !found,
            how => unsupported_how(self.name(), how),
        }
    }

    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        options: CompareOptions,
    ) -> Option<Ordering> {
        let (FieldValue::Text(a), FieldValue::Text(b)) = (left, right) else {
            return None;
        };

        match options.text {
            TextMode::Cs => Some(a.cmp(b)),
            TextMode::Ci => Some(casefold(a).cmp(&casefold(b))),
        }
    }

    fn stringify(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Text(text) => Some(text.clone()),
            _ => None,
        }
    }
}

///
/// DateType
///

struct DateType;

fn date_operands(left: Timespec, right: Timespec, mode: DateMatch) -> (Timespec, Timespec) {
    match mode {
        DateMatch::Normal => (left, right),
        DateMatch::Rounded => (left.canonical_day(), right.canonical_day()),
    }
}

impl CoreType for DateType {
    fn name(&self) -> CoreTypeName {
        names::DATE
    }

    fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool {
        let PredicatePayload::Date { mode, when } = predicate.payload() else {
            return mismatch(self.name(), value);
        };
        let FieldValue::Date(instant) = value else {
            return mismatch(self.name(), value);
        };

        let (object, operand) = date_operands(*instant, *when, *mode);
        predicate.how().ord_matches(object.cmp(&operand))
    }

    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        options: CompareOptions,
    ) -> Option<Ordering> {
        let (FieldValue::Date(a), FieldValue::Date(b)) = (left, right) else {
            return None;
        };

        let (a, b) = date_operands(*a, *b, options.date);
        Some(a.cmp(&b))
    }

    fn stringify(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Date(instant) => Some(instant.to_string()),
            _ => None,
        }
    }
}

///
/// NumericType
///
/// Shared by the `numeric` and `debcred` registrations; the debit/credit
/// type name exists so object modules can declare sign-filtered amounts
/// distinctly.
///

struct NumericType {
    name: CoreTypeName,
}

impl NumericType {
    const fn numeric() -> Self {
        Self {
            name: names::NUMERIC,
        }
    }

    const fn debcred() -> Self {
        Self {
            name: names::DEBCRED,
        }
    }
}

fn within_equal_epsilon(object: Numeric, operand: Numeric) -> bool {
    match object.abs().checked_sub(operand.abs()) {
        Some(diff) => diff.abs() < EQUAL_EPSILON,
        None => false,
    }
}

impl CoreType for NumericType {
    fn name(&self) -> CoreTypeName {
        self.name
    }

    fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool {
        let PredicatePayload::Numeric { mode, amount } = predicate.payload() else {
            return mismatch(self.name(), value);
        };
        let FieldValue::Numeric(object) = value else {
            return mismatch(self.name(), value);
        };

        // The sign filter short-circuits: a value on the wrong side of
        // zero does not match, whatever the magnitudes say.
        match mode {
            NumericMatch::Any => {}
            NumericMatch::Credit => {
                if object.is_negative() {
                    return false;
                }
            }
            NumericMatch::Debit => {
                if object.is_positive() {
                    return false;
                }
            }
        }

        match predicate.how() {
            CompareHow::Equal => within_equal_epsilon(*object, *amount),
            CompareHow::Neq => !within_equal_epsilon(*object, *amount),
            how => how.ord_matches(object.abs().cmp(&amount.abs())),
        }
    }

    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _options: CompareOptions,
    ) -> Option<Ordering> {
        let (FieldValue::Numeric(a), FieldValue::Numeric(b)) = (left, right) else {
            return None;
        };

        Some(a.cmp(b))
    }

    fn stringify(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Numeric(amount) => Some(amount.to_string()),
            _ => None,
        }
    }
}

///
/// GuidType
///
/// Unorderable; match-only set semantics. `All` runs against the
/// many-cardinality `GuidList` shape, the other modes against the scalar
/// `Guid` shape.
///

struct GuidType;

impl CoreType for GuidType {
    fn name(&self) -> CoreTypeName {
        names::GUID
    }

    fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool {
        let PredicatePayload::Guid { mode, guids } = predicate.payload() else {
            return mismatch(self.name(), value);
        };

        match (mode, value) {
            (GuidMatch::Any, FieldValue::Guid(object)) => {
                object.is_some_and(|guid| guids.contains(&guid))
            }
            (GuidMatch::None, FieldValue::Guid(object)) => {
                !object.is_some_and(|guid| guids.contains(&guid))
            }
            (GuidMatch::Null, FieldValue::Guid(object)) => object.is_none(),
            (GuidMatch::All, FieldValue::GuidList(members)) => {
                guids.iter().all(|guid| members.contains(guid))
            }
            _ => mismatch(self.name(), value),
        }
    }
}

///
/// Int64Type
///

struct Int64Type;

impl CoreType for Int64Type {
    fn name(&self) -> CoreTypeName {
        names::INT64
    }

    fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool {
        let PredicatePayload::Int64(operand) = predicate.payload() else {
            return mismatch(self.name(), value);
        };
        let FieldValue::Int64(object) = value else {
            return mismatch(self.name(), value);
        };

        predicate.how().ord_matches(object.cmp(operand))
    }

    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _options: CompareOptions,
    ) -> Option<Ordering> {
        let (FieldValue::Int64(a), FieldValue::Int64(b)) = (left, right) else {
            return None;
        };

        Some(a.cmp(b))
    }

    fn stringify(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Int64(object) => Some(object.to_string()),
            _ => None,
        }
    }
}

///
/// DoubleType
///

struct DoubleType;

impl CoreType for DoubleType {
    fn name(&self) -> CoreTypeName {
        names::DOUBLE
    }

    fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool {
        let PredicatePayload::Double(operand) = predicate.payload() else {
            return mismatch(self.name(), value);
        };
        let FieldValue::Double(object) = value else {
            return mismatch(self.name(), value);
        };

        // NaN orders with nothing and therefore matches nothing.
        match object.partial_cmp(operand) {
            Some(ordering) => predicate.how().ord_matches(ordering),
            None => false,
        }
    }

    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _options: CompareOptions,
    ) -> Option<Ordering> {
        let (FieldValue::Double(a), FieldValue::Double(b)) = (left, right) else {
            return None;
        };

        a.partial_cmp(b)
    }

    fn stringify(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Double(object) => Some(object.to_string()),
            _ => None,
        }
    }
}

///
/// BooleanType
///

struct BooleanType;

impl CoreType for BooleanType {
    fn name(&self) -> CoreTypeName {
        names::BOOLEAN
    }

    fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool {
        let PredicatePayload::Boolean(operand) = predicate.payload() else {
            return mismatch(self.name(), value);
        };
        let FieldValue::Bool(object) = value else {
            return mismatch(self.name(), value);
        };

        match predicate.how() {
            CompareHow::Equal => object == operand,
            CompareHow::Neq => object != operand,
            how => unsupported_how(self.name(), how),
        }
    }

    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _options: CompareOptions,
    ) -> Option<Ordering> {
        let (FieldValue::Bool(a), FieldValue::Bool(b)) = (left, right) else {
            return None;
        };

        Some(a.cmp(b))
    }

    fn stringify(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Bool(object) => Some(object.to_string()),
            _ => None,
        }
    }
}

///
/// CharType
///

struct CharType;

impl CoreType for CharType {
    fn name(&self) -> CoreTypeName {
        names::CHAR
    }

    fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool {
        let PredicatePayload::Char { mode, set } = predicate.payload() else {
            return mismatch(self.name(), value);
        };
        let FieldValue::Char(object) = value else {
            return mismatch(self.name(), value);
        };

        match mode {
            CharMatch::Any => set.contains(*object),
            CharMatch::None => !set.contains(*object),
        }
    }

    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        _options: CompareOptions,
    ) -> Option<Ordering> {
        let (FieldValue::Char(a), FieldValue::Char(b)) = (left, right) else {
            return None;
        };

        Some(a.cmp(b))
    }

    fn stringify(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Char(object) => Some(object.to_string()),
            _ => None,
        }
    }
}

///
/// KvpType
///
/// Unorderable across objects; matching walks the predicate's key path
/// into the object's frame and compares same-variant values only.
///

struct KvpType;

impl CoreType for KvpType {
    fn name(&self) -> CoreTypeName {
        names::KVP
    }

    fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool {
        let PredicatePayload::Kvp { path, value: operand } = predicate.payload() else {
            return mismatch(self.name(), value);
        };
        let FieldValue::Kvp(frame) = value else {
            return mismatch(self.name(), value);
        };

        let Some(found) = frame.get_path(path) else {
            return false;
        };
        if !KvpValue::same_variant(found, operand) {
            return false;
        }

        predicate
            .how()
            .ord_matches(KvpValue::canonical_cmp(found, operand))
    }
}
