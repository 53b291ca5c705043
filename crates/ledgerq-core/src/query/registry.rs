//! Module: query::registry
//! Responsibility: the core-type table and its dispatch surface.
//! Does not own: per-type match/compare algorithms (see `query::semantics`).
//! Boundary: object-class evaluation and callers dispatch through here by
//! core type name; an unknown name never fails evaluation, it just does
//! not match.

use crate::{
    error::RegistryError,
    kvp::KvpFrame,
    query::{
        predicate::{DateMatch, Predicate, TextMode},
        semantics,
    },
    types::{Guid, Numeric, Timespec},
};
use serde::{Deserialize, Serialize};
use std::{
    cmp::Ordering,
    collections::{HashMap, hash_map::Entry},
};

///
/// CoreTypeName
///
/// Core types are addressed by stable string names so object modules can
/// declare parameter types without depending on the registry's contents.
///

pub type CoreTypeName = &'static str;

pub mod names {
    //! Canonical names of the built-in core types.

    use super::CoreTypeName;

    pub const STRING: CoreTypeName = "string";
    pub const DATE: CoreTypeName = "date";
    pub const NUMERIC: CoreTypeName = "numeric";
    pub const DEBCRED: CoreTypeName = "debcred";
    pub const GUID: CoreTypeName = "guid";
    pub const INT64: CoreTypeName = "int64";
    pub const DOUBLE: CoreTypeName = "double";
    pub const BOOLEAN: CoreTypeName = "boolean";
    pub const CHAR: CoreTypeName = "character";
    pub const KVP: CoreTypeName = "kvp";
}

///
/// FieldValue
///
/// What a parameter accessor yields for one object field.
///
/// `Guid(None)` means the accessor ran but the field carries no identifier;
/// `GuidList` is the many-cardinality shape used by subset matching.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Date(Timespec),
    Numeric(Numeric),
    Guid(Option<Guid>),
    GuidList(Vec<Guid>),
    Int64(i64),
    Double(f64),
    Bool(bool),
    Char(char),
    Kvp(KvpFrame),
}

macro_rules! impl_field_from {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for FieldValue {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_field_from! {
    String      => Text,
    &str        => Text,
    Timespec    => Date,
    Numeric     => Numeric,
    i64         => Int64,
    f64         => Double,
    bool        => Bool,
    char        => Char,
    KvpFrame    => Kvp,
    Option<Guid> => Guid,
    Vec<Guid>   => GuidList,
}

impl From<Guid> for FieldValue {
    fn from(guid: Guid) -> Self {
        Self::Guid(Some(guid))
    }
}

///
/// CompareOptions
///
/// Policy knobs for sort comparison. Matching carries its policy inside
/// the predicate; sorting carries it here.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompareOptions {
    pub text: TextMode,
    pub date: DateMatch,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            text: TextMode::Cs,
            date: DateMatch::Normal,
        }
    }
}

///
/// CoreType
///
/// Capability object for one scalar core type. `compare` and `stringify`
/// default to `None`: guid and kvp have no useful total order and no
/// registered textual form.
///

pub trait CoreType {
    fn name(&self) -> CoreTypeName;

    /// Does `value` satisfy `predicate`? A value whose shape does not fit
    /// the type never matches.
    fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool;

    fn compare(
        &self,
        left: &FieldValue,
        right: &FieldValue,
        options: CompareOptions,
    ) -> Option<Ordering> {
        let _ = (left, right, options);
        None
    }

    fn stringify(&self, value: &FieldValue) -> Option<String> {
        let _ = value;
        None
    }
}

///
/// CoreRegistry
///
/// Name-keyed table of core types with an idempotent init/shutdown
/// lifecycle. The built-in set is seeded exactly once; re-registering an
/// existing name is rejected (first registration wins).
///

pub struct CoreRegistry {
    types: HashMap<CoreTypeName, Box<dyn CoreType>>,
    ready: bool,
}

impl CoreRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            ready: false,
        }
    }

    /// Construct a registry with the built-in types already seeded.
    #[must_use]
    pub fn bootstrap() -> Self {
        let mut registry = Self::new();
        registry.init();
        registry
    }

    /// Seed the built-in core types. Calling twice is a no-op.
    pub fn init(&mut self) {
        if self.ready {
            return;
        }

        for core in semantics::builtin_types() {
            self.types.entry(core.name()).or_insert(core);
        }
        self.ready = true;
    }

    /// Tear the table down. Calling before `init` or twice is a no-op.
    pub fn shutdown(&mut self) {
        if !self.ready {
            return;
        }

        self.types.clear();
        self.ready = false;
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Register an additional core type.
    pub fn register(&mut self, core: Box<dyn CoreType>) -> Result<(), RegistryError> {
        let name = core.name();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        match self.types.entry(name) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateType(name)),
            Entry::Vacant(slot) => {
                slot.insert(core);
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&dyn CoreType> {
        self.types.get(name).map(AsRef::as_ref)
    }

    /// Evaluate one predicate against one field value, dispatched by the
    /// predicate's core type name.
    #[must_use]
    pub fn matches(&self, predicate: &Predicate, value: &FieldValue) -> bool {
        match self.lookup(predicate.type_name()) {
            Some(core) => core.matches(predicate, value),
            None => {
                tracing::warn!(
                    core_type = predicate.type_name(),
                    "no core type registered for predicate; treating as no match"
                );
                false
            }
        }
    }

    /// Sort comparison for a named core type; `None` means the type is
    /// unorderable or the operands do not fit it.
    #[must_use]
    pub fn compare(
        &self,
        name: &str,
        left: &FieldValue,
        right: &FieldValue,
        options: CompareOptions,
    ) -> Option<Ordering> {
        self.lookup(name)?.compare(left, right, options)
    }

    /// Render a field value of a named core type for display.
    #[must_use]
    pub fn stringify(&self, name: &str, value: &FieldValue) -> Option<String> {
        self.lookup(name)?.stringify(value)
    }
}

impl Default for CoreRegistry {
    fn default() -> Self {
        Self::new()
    }
}
