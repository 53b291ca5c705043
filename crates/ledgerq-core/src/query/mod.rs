mod object;
mod predicate;
pub mod registry;
mod semantics;


pub use object::{ObjectClass, ObjectHandle, ObjectRegistry, PARAM_GUID, ParamValue};
pub use predicate::{
    CharMatch, CompareHow, DateMatch, GuidMatch, NumericMatch, Predicate, PredicateError,
    PredicatePayload, StringMatcher, TextMode,
};
pub use registry::{CompareOptions, CoreRegistry, CoreType, CoreTypeName, FieldValue};
