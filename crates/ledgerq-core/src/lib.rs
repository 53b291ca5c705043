//! Core runtime for ledgerq: the typed predicate-matching and sorting
//! engine used to filter ledger business objects, the key-value frame
//! store, and the polymorphic owner variant with its lot persistence.
#![warn(unreachable_pub)]

pub mod error;
pub mod kvp;
pub mod model;
pub mod owner;
pub mod query;
pub mod types;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, registries internals, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::Book,
        owner::{Owner, OwnerType},
        query::{CompareHow, CoreRegistry, FieldValue, ObjectRegistry, Predicate},
        types::{Guid, Numeric, Timespec},
    };
}
