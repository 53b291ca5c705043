use thiserror::Error as ThisError;

///
/// RegistryError
///
/// Failures raised by the core-type and object-class registries.
/// Lookup misses during evaluation are reported here; matching itself
/// never fails (a predicate that cannot be evaluated simply does not match).
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum RegistryError {
    #[error("type or class name must be non-empty")]
    EmptyName,

    #[error("core type '{0}' is already registered")]
    DuplicateType(&'static str),

    #[error("object class '{0}' is already registered")]
    DuplicateClass(&'static str),

    #[error("object class '{0}' is registered for a different object type")]
    ClassTypeMismatch(&'static str),

    #[error("unknown object class '{0}'")]
    UnknownClass(&'static str),

    #[error("unknown parameter '{param}' on object class '{class}'")]
    UnknownParam {
        class: &'static str,
        param: &'static str,
    },
}
