use crate::{
    model::{Customer, Employee, Job, Lot, Vendor},
    owner::{Owner, OwnerType},
    types::Guid,
};
use std::{collections::HashMap, rc::Rc};

///
/// Book
///
/// Guid-keyed lookup tables for the business objects the query layer can
/// resolve. Insertion replaces an existing entry with the same guid.
///

#[derive(Clone, Debug, Default)]
pub struct Book {
    customers: HashMap<Guid, Rc<Customer>>,
    vendors: HashMap<Guid, Rc<Vendor>>,
    employees: HashMap<Guid, Rc<Employee>>,
    jobs: HashMap<Guid, Rc<Job>>,
    lots: HashMap<Guid, Rc<Lot>>,
}

impl Book {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_customer(&mut self, customer: Rc<Customer>) {
        self.customers.insert(customer.guid(), customer);
    }

    pub fn insert_vendor(&mut self, vendor: Rc<Vendor>) {
        self.vendors.insert(vendor.guid(), vendor);
    }

    pub fn insert_employee(&mut self, employee: Rc<Employee>) {
        self.employees.insert(employee.guid(), employee);
    }

    pub fn insert_job(&mut self, job: Rc<Job>) {
        self.jobs.insert(job.guid(), job);
    }

    pub fn insert_lot(&mut self, lot: Rc<Lot>) {
        self.lots.insert(lot.guid(), lot);
    }

    #[must_use]
    pub fn lookup_customer(&self, guid: &Guid) -> Option<Rc<Customer>> {
        self.customers.get(guid).cloned()
    }

    #[must_use]
    pub fn lookup_vendor(&self, guid: &Guid) -> Option<Rc<Vendor>> {
        self.vendors.get(guid).cloned()
    }

    #[must_use]
    pub fn lookup_employee(&self, guid: &Guid) -> Option<Rc<Employee>> {
        self.employees.get(guid).cloned()
    }

    #[must_use]
    pub fn lookup_job(&self, guid: &Guid) -> Option<Rc<Job>> {
        self.jobs.get(guid).cloned()
    }

    #[must_use]
    pub fn lookup_lot(&self, guid: &Guid) -> Option<Rc<Lot>> {
        self.lots.get(guid).cloned()
    }

    /// Kind-dispatched lookup used when reconstructing an owner from its
    /// persisted `{type, guid}` pair. `None` and `Undefined` owners are
    /// not resolvable by guid.
    #[must_use]
    pub fn lookup_owner(&self, owner_type: OwnerType, guid: &Guid) -> Option<Owner> {
        match owner_type {
            OwnerType::Customer => self.lookup_customer(guid).map(Owner::Customer),
            OwnerType::Job => self.lookup_job(guid).map(Owner::Job),
            OwnerType::Vendor => self.lookup_vendor(guid).map(Owner::Vendor),
            OwnerType::Employee => self.lookup_employee(guid).map(Owner::Employee),
            OwnerType::None | OwnerType::Undefined => None,
        }
    }
}
