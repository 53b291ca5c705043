//! The polymorphic "other party" of a business transaction.
//!
//! An [`Owner`] is a closed variant over the concrete party kinds plus an
//! opaque escape hatch; the compiler enforces tag/payload consistency that
//! the original pointer-union design left to discipline.

#[cfg(test)]
mod tests;

use crate::{
    error::RegistryError,
    kvp::{KvpError, KvpValue},
    model::{
        Book, CUSTOMER_CLASS, Customer, EMPLOYEE_CLASS, Employee, JOB_CLASS, Job, LOT_CLASS, Lot,
        PARAM_NAME, PARAM_OWNER, VENDOR_CLASS, Vendor,
    },
    query::{
        ObjectClass, ObjectHandle, ObjectRegistry, PARAM_GUID, ParamValue,
        registry::{FieldValue, names},
    },
    types::{Commodity, Guid},
};
use serde::{Deserialize, Serialize};
use std::{any::Any, cmp::Ordering, fmt, rc::Rc};
use thiserror::Error as ThisError;

pub const OWNER_CLASS: &str = "owner";

pub const PARAM_TYPE: &str = "type";
pub const PARAM_CUSTOMER: &str = "customer";
pub const PARAM_JOB: &str = "job";
pub const PARAM_VENDOR: &str = "vendor";
pub const PARAM_EMPLOYEE: &str = "employee";
pub const PARAM_PARENT: &str = "parent";
pub const PARAM_PARENT_GUID: &str = "parent-guid";

// Persisted owner-on-lot encoding. These path segments and the type tag
// discriminants are a stable wire format shared with existing data files.
pub const OWNER_FRAME_KEY: &str = "gnc-owner";
pub const OWNER_TYPE_KEY: &str = "owner-type";
pub const OWNER_GUID_KEY: &str = "owner-guid";

///
/// OwnerType
///
/// Tag values are persisted as signed 64-bit integers and must not be
/// renumbered.
///

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[repr(i64)]
pub enum OwnerType {
    None = 0,
    Undefined = 1,
    Customer = 2,
    Job = 3,
    Vendor = 4,
    Employee = 5,
}

impl OwnerType {
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self as i64
    }

    #[must_use]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Undefined),
            2 => Some(Self::Customer),
            3 => Some(Self::Job),
            4 => Some(Self::Vendor),
            5 => Some(Self::Employee),
            _ => None,
        }
    }
}

///
/// LotAttachError
///

#[derive(Debug, ThisError)]
pub enum LotAttachError {
    #[error("owner of type {0:?} cannot be attached to a lot")]
    NotAttachable(OwnerType),

    #[error(transparent)]
    Kvp(#[from] KvpError),
}

///
/// OwnerFromLotError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum OwnerFromLotError {
    #[error("lot carries no owner type slot")]
    MissingTypeSlot,

    #[error("lot carries no owner guid slot")]
    MissingGuidSlot,

    #[error("stored owner type tag {0} is unknown")]
    UnknownTypeTag(i64),

    #[error("stored owner type {0:?} is not persistable")]
    UnpersistableType(OwnerType),

    #[error("no {owner_type:?} with guid {guid} in the book")]
    UnresolvedGuid { owner_type: OwnerType, guid: Guid },
}

///
/// Owner
///
/// The payload handles are shared, non-owning references to book-held
/// objects; cloning an owner clones handles, never parties. Re-pointing
/// an owner is plain reassignment, a full overwrite of tag and payload.
///

#[derive(Clone, Default)]
pub enum Owner {
    #[default]
    None,
    Undefined(Rc<dyn Any>),
    Customer(Rc<Customer>),
    Job(Rc<Job>),
    Vendor(Rc<Vendor>),
    Employee(Rc<Employee>),
}

impl Owner {
    #[must_use]
    pub const fn owner_type(&self) -> OwnerType {
        match self {
            Self::None => OwnerType::None,
            Self::Undefined(_) => OwnerType::Undefined,
            Self::Customer(_) => OwnerType::Customer,
            Self::Job(_) => OwnerType::Job,
            Self::Vendor(_) => OwnerType::Vendor,
            Self::Employee(_) => OwnerType::Employee,
        }
    }

    /// An owner is valid when it carries a payload; only `None` has none.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !matches!(self, Self::None)
    }

    #[must_use]
    pub fn customer(&self) -> Option<Rc<Customer>> {
        match self {
            Self::Customer(customer) => Some(Rc::clone(customer)),
            _ => None,
        }
    }

    #[must_use]
    pub fn job(&self) -> Option<Rc<Job>> {
        match self {
            Self::Job(job) => Some(Rc::clone(job)),
            _ => None,
        }
    }

    #[must_use]
    pub fn vendor(&self) -> Option<Rc<Vendor>> {
        match self {
            Self::Vendor(vendor) => Some(Rc::clone(vendor)),
            _ => None,
        }
    }

    #[must_use]
    pub fn employee(&self) -> Option<Rc<Employee>> {
        match self {
            Self::Employee(employee) => Some(Rc::clone(employee)),
            _ => None,
        }
    }

    #[must_use]
    pub fn guid(&self) -> Option<Guid> {
        match self {
            Self::None | Self::Undefined(_) => None,
            Self::Customer(customer) => Some(customer.guid()),
            Self::Job(job) => Some(job.guid()),
            Self::Vendor(vendor) => Some(vendor.guid()),
            Self::Employee(employee) => Some(employee.guid()),
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::None | Self::Undefined(_) => None,
            Self::Customer(customer) => Some(customer.name()),
            Self::Job(job) => Some(job.name()),
            Self::Vendor(vendor) => Some(vendor.name()),
            Self::Employee(employee) => Some(employee.name()),
        }
    }

    /// A job trades in its owner's currency, so the lookup recurses.
    #[must_use]
    pub fn currency(&self) -> Option<Commodity> {
        match self {
            Self::None | Self::Undefined(_) => None,
            Self::Customer(customer) => Some(customer.currency().clone()),
            Self::Job(job) => job.owner().currency(),
            Self::Vendor(vendor) => Some(vendor.currency().clone()),
            Self::Employee(employee) => Some(employee.currency().clone()),
        }
    }

    /// Resolve a job to the party it ultimately belongs to; leaf kinds
    /// resolve to themselves.
    #[must_use]
    pub fn end_owner(&self) -> Option<Self> {
        match self {
            Self::None | Self::Undefined(_) => None,
            Self::Job(job) => job.owner().end_owner(),
            Self::Customer(_) | Self::Vendor(_) | Self::Employee(_) => Some(self.clone()),
        }
    }

    #[must_use]
    pub fn end_guid(&self) -> Option<Guid> {
        self.end_owner()?.guid()
    }

    /// Domain ordering: tag order across kinds, the kind's own comparator
    /// within a kind. `None` and `Undefined` owners compare by tag only.
    #[must_use]
    pub fn compare(left: &Self, right: &Self) -> Ordering {
        match (left, right) {
            (Self::Customer(a), Self::Customer(b)) => Customer::compare(a, b),
            (Self::Job(a), Self::Job(b)) => Job::compare(a, b),
            (Self::Vendor(a), Self::Vendor(b)) => Vendor::compare(a, b),
            (Self::Employee(a), Self::Employee(b)) => Employee::compare(a, b),
            _ => left.owner_type().cmp(&right.owner_type()),
        }
    }

    /// Handle identity: same tag and same referenced object. Two distinct
    /// but field-equal parties are not equal under this check.
    #[must_use]
    pub fn ptr_equal(left: &Self, right: &Self) -> bool {
        match (left, right) {
            (Self::None, Self::None) => true,
            (Self::Undefined(a), Self::Undefined(b)) => Rc::ptr_eq(a, b),
            (Self::Customer(a), Self::Customer(b)) => Rc::ptr_eq(a, b),
            (Self::Job(a), Self::Job(b)) => Rc::ptr_eq(a, b),
            (Self::Vendor(a), Self::Vendor(b)) => Rc::ptr_eq(a, b),
            (Self::Employee(a), Self::Employee(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Persist this owner into a lot's key-value frame as the stable
    /// `{type, guid}` pair.
    pub fn attach_to_lot(&self, lot: &mut Lot) -> Result<(), LotAttachError> {
        let guid = self
            .guid()
            .ok_or(LotAttachError::NotAttachable(self.owner_type()))?;

        lot.kvp_mut().set_path(
            &[OWNER_FRAME_KEY, OWNER_TYPE_KEY],
            KvpValue::Int64(self.owner_type().as_i64()),
        )?;
        lot.kvp_mut()
            .set_path(&[OWNER_FRAME_KEY, OWNER_GUID_KEY], KvpValue::Guid(guid))?;

        Ok(())
    }

    /// Reconstruct the owner attached to a lot.
    ///
    /// Returns an owned value; the caller decides where it lives.
    pub fn from_lot(book: &Book, lot: &Lot) -> Result<Self, OwnerFromLotError> {
        let Some(KvpValue::Int64(raw)) = lot.kvp().get_path(&[OWNER_FRAME_KEY, OWNER_TYPE_KEY])
        else {
            return Err(OwnerFromLotError::MissingTypeSlot);
        };
        let owner_type =
            OwnerType::from_i64(*raw).ok_or(OwnerFromLotError::UnknownTypeTag(*raw))?;

        let Some(KvpValue::Guid(guid)) = lot.kvp().get_path(&[OWNER_FRAME_KEY, OWNER_GUID_KEY])
        else {
            return Err(OwnerFromLotError::MissingGuidSlot);
        };

        match owner_type {
            OwnerType::None | OwnerType::Undefined => {
                Err(OwnerFromLotError::UnpersistableType(owner_type))
            }
            _ => book
                .lookup_owner(owner_type, guid)
                .ok_or(OwnerFromLotError::UnresolvedGuid {
                    owner_type,
                    guid: *guid,
                }),
        }
    }
}

impl fmt::Debug for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("Owner::None"),
            Self::Undefined(_) => f.write_str("Owner::Undefined(..)"),
            Self::Customer(customer) => {
                f.debug_tuple("Owner::Customer").field(&customer.guid()).finish()
            }
            Self::Job(job) => f.debug_tuple("Owner::Job").field(&job.guid()).finish(),
            Self::Vendor(vendor) => f.debug_tuple("Owner::Vendor").field(&vendor.guid()).finish(),
            Self::Employee(employee) => f
                .debug_tuple("Owner::Employee")
                .field(&employee.guid())
                .finish(),
        }
    }
}

/// Register the owner class, and the lot class whose synthetic `owner`
/// parameter lets a lot be queried by the owner attached to it.
pub fn register_owner_class(registry: &mut ObjectRegistry) -> Result<(), RegistryError> {
    registry.register(
        ObjectClass::<Owner>::new(OWNER_CLASS)
            .with_sort(Owner::compare)
            .with_param(PARAM_TYPE, names::INT64, |owner, _| {
                Some(ParamValue::Field(FieldValue::Int64(
                    owner.owner_type().as_i64(),
                )))
            })
            .with_param(PARAM_CUSTOMER, CUSTOMER_CLASS, |owner, _| {
                owner
                    .customer()
                    .map(|customer| ParamValue::Object(ObjectHandle::new(CUSTOMER_CLASS, customer)))
            })
            .with_param(PARAM_JOB, JOB_CLASS, |owner, _| {
                owner
                    .job()
                    .map(|job| ParamValue::Object(ObjectHandle::new(JOB_CLASS, job)))
            })
            .with_param(PARAM_VENDOR, VENDOR_CLASS, |owner, _| {
                owner
                    .vendor()
                    .map(|vendor| ParamValue::Object(ObjectHandle::new(VENDOR_CLASS, vendor)))
            })
            .with_param(PARAM_EMPLOYEE, EMPLOYEE_CLASS, |owner, _| {
                owner
                    .employee()
                    .map(|employee| ParamValue::Object(ObjectHandle::new(EMPLOYEE_CLASS, employee)))
            })
            .with_param(PARAM_PARENT, OWNER_CLASS, |owner, _| {
                owner
                    .end_owner()
                    .map(|parent| ParamValue::Object(ObjectHandle::new(OWNER_CLASS, Rc::new(parent))))
            })
            .with_param(PARAM_PARENT_GUID, names::GUID, |owner, _| {
                Some(ParamValue::Field(FieldValue::Guid(owner.end_guid())))
            })
            .with_param(PARAM_NAME, names::STRING, |owner, _| {
                owner
                    .name()
                    .map(|name| ParamValue::Field(FieldValue::from(name)))
            })
            .with_param(PARAM_GUID, names::GUID, |owner, _| {
                Some(ParamValue::Field(FieldValue::Guid(owner.guid())))
            }),
    )?;

    registry.register(
        ObjectClass::<Lot>::new(LOT_CLASS)
            .with_param(PARAM_GUID, names::GUID, |lot, _| {
                Some(ParamValue::Field(FieldValue::from(lot.guid())))
            })
            .with_param(PARAM_OWNER, OWNER_CLASS, |lot, book| {
                Owner::from_lot(book, lot)
                    .ok()
                    .map(|owner| ParamValue::Object(ObjectHandle::new(OWNER_CLASS, Rc::new(owner))))
            }),
    )?;

    Ok(())
}
