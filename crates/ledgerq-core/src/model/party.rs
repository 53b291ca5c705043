use crate::{
    error::RegistryError,
    owner::{OWNER_CLASS, Owner},
    query::{
        ObjectClass, ObjectHandle, ObjectRegistry, PARAM_GUID, ParamValue,
        registry::{FieldValue, names},
    },
    types::{Commodity, Guid},
};
use std::{cmp::Ordering, rc::Rc};

pub const CUSTOMER_CLASS: &str = "customer";
pub const VENDOR_CLASS: &str = "vendor";
pub const EMPLOYEE_CLASS: &str = "employee";
pub const JOB_CLASS: &str = "job";

pub const PARAM_NAME: &str = "name";
pub const PARAM_ACTIVE: &str = "active";
pub const PARAM_REFERENCE: &str = "reference";
pub const PARAM_OWNER: &str = "owner";

///
/// Customer
///

#[derive(Clone, Debug)]
pub struct Customer {
    guid: Guid,
    name: String,
    currency: Commodity,
    active: bool,
}

impl Customer {
    pub fn new(name: impl Into<String>, currency: Commodity) -> Self {
        Self::with_guid(Guid::new_random(), name, currency)
    }

    pub fn with_guid(guid: Guid, name: impl Into<String>, currency: Commodity) -> Self {
        Self {
            guid,
            name: name.into(),
            currency,
            active: true,
        }
    }

    #[must_use]
    pub const fn guid(&self) -> Guid {
        self.guid
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn currency(&self) -> &Commodity {
        &self.currency
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Domain ordering: by name, guid as the tie-breaker.
    #[must_use]
    pub fn compare(left: &Self, right: &Self) -> Ordering {
        left.name
            .cmp(&right.name)
            .then_with(|| left.guid.cmp(&right.guid))
    }
}

///
/// Vendor
///

#[derive(Clone, Debug)]
pub struct Vendor {
    guid: Guid,
    name: String,
    currency: Commodity,
    active: bool,
}

impl Vendor {
    pub fn new(name: impl Into<String>, currency: Commodity) -> Self {
        Self::with_guid(Guid::new_random(), name, currency)
    }

    pub fn with_guid(guid: Guid, name: impl Into<String>, currency: Commodity) -> Self {
        Self {
            guid,
            name: name.into(),
            currency,
            active: true,
        }
    }

    #[must_use]
    pub const fn guid(&self) -> Guid {
        self.guid
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn currency(&self) -> &Commodity {
        &self.currency
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    #[must_use]
    pub fn compare(left: &Self, right: &Self) -> Ordering {
        left.name
            .cmp(&right.name)
            .then_with(|| left.guid.cmp(&right.guid))
    }
}

///
/// Employee
///
/// An employee's display name is its username.
///

#[derive(Clone, Debug)]
pub struct Employee {
    guid: Guid,
    username: String,
    currency: Commodity,
    active: bool,
}

impl Employee {
    pub fn new(username: impl Into<String>, currency: Commodity) -> Self {
        Self::with_guid(Guid::new_random(), username, currency)
    }

    pub fn with_guid(guid: Guid, username: impl Into<String>, currency: Commodity) -> Self {
        Self {
            guid,
            username: username.into(),
            currency,
            active: true,
        }
    }

    #[must_use]
    pub const fn guid(&self) -> Guid {
        self.guid
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub const fn currency(&self) -> &Commodity {
        &self.currency
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    #[must_use]
    pub fn compare(left: &Self, right: &Self) -> Ordering {
        left.username
            .cmp(&right.username)
            .then_with(|| left.guid.cmp(&right.guid))
    }
}

///
/// Job
///
/// A job belongs to a customer or vendor; its currency and end owner are
/// the owner's. The owner handle is not validated here; dispatching code
/// treats a job with a non-party owner as unresolvable.
///

#[derive(Clone, Debug)]
pub struct Job {
    guid: Guid,
    name: String,
    reference: String,
    owner: Owner,
}

impl Job {
    pub fn new(name: impl Into<String>, owner: Owner) -> Self {
        Self::with_guid(Guid::new_random(), name, owner)
    }

    pub fn with_guid(guid: Guid, name: impl Into<String>, owner: Owner) -> Self {
        Self {
            guid,
            name: name.into(),
            reference: String::new(),
            owner,
        }
    }

    #[must_use]
    pub const fn guid(&self) -> Guid {
        self.guid
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn set_reference(&mut self, reference: impl Into<String>) {
        self.reference = reference.into();
    }

    #[must_use]
    pub const fn owner(&self) -> &Owner {
        &self.owner
    }

    pub fn set_owner(&mut self, owner: Owner) {
        self.owner = owner;
    }

    #[must_use]
    pub fn compare(left: &Self, right: &Self) -> Ordering {
        left.name
            .cmp(&right.name)
            .then_with(|| left.guid.cmp(&right.guid))
    }
}

/// Register the four party classes and their queryable parameters.
pub fn register_party_classes(registry: &mut ObjectRegistry) -> Result<(), RegistryError> {
    registry.register(
        ObjectClass::<Customer>::new(CUSTOMER_CLASS)
            .with_sort(Customer::compare)
            .with_param(PARAM_NAME, names::STRING, |customer, _| {
                Some(ParamValue::Field(FieldValue::from(customer.name())))
            })
            .with_param(PARAM_GUID, names::GUID, |customer, _| {
                Some(ParamValue::Field(FieldValue::from(customer.guid())))
            })
            .with_param(PARAM_ACTIVE, names::BOOLEAN, |customer, _| {
                Some(ParamValue::Field(FieldValue::Bool(customer.is_active())))
            }),
    )?;

    registry.register(
        ObjectClass::<Vendor>::new(VENDOR_CLASS)
            .with_sort(Vendor::compare)
            .with_param(PARAM_NAME, names::STRING, |vendor, _| {
                Some(ParamValue::Field(FieldValue::from(vendor.name())))
            })
            .with_param(PARAM_GUID, names::GUID, |vendor, _| {
                Some(ParamValue::Field(FieldValue::from(vendor.guid())))
            })
            .with_param(PARAM_ACTIVE, names::BOOLEAN, |vendor, _| {
                Some(ParamValue::Field(FieldValue::Bool(vendor.is_active())))
            }),
    )?;

    registry.register(
        ObjectClass::<Employee>::new(EMPLOYEE_CLASS)
            .with_sort(Employee::compare)
            .with_param(PARAM_NAME, names::STRING, |employee, _| {
                Some(ParamValue::Field(FieldValue::from(employee.name())))
            })
            .with_param(PARAM_GUID, names::GUID, |employee, _| {
                Some(ParamValue::Field(FieldValue::from(employee.guid())))
            })
            .with_param(PARAM_ACTIVE, names::BOOLEAN, |employee, _| {
                Some(ParamValue::Field(FieldValue::Bool(employee.is_active())))
            }),
    )?;

    registry.register(
        ObjectClass::<Job>::new(JOB_CLASS)
            .with_sort(Job::compare)
            .with_param(PARAM_NAME, names::STRING, |job, _| {
                Some(ParamValue::Field(FieldValue::from(job.name())))
            })
            .with_param(PARAM_GUID, names::GUID, |job, _| {
                Some(ParamValue::Field(FieldValue::from(job.guid())))
            })
            .with_param(PARAM_REFERENCE, names::STRING, |job, _| {
                Some(ParamValue::Field(FieldValue::from(job.reference())))
            })
            .with_param(PARAM_OWNER, OWNER_CLASS, |job, _| {
                Some(ParamValue::Object(ObjectHandle::new(
                    OWNER_CLASS,
                    Rc::new(job.owner().clone()),
                )))
            }),
    )?;

    Ok(())
}
