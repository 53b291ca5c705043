mod book;
mod lot;
mod party;

pub use book::Book;
pub use lot::{LOT_CLASS, Lot};
pub use party::{
    CUSTOMER_CLASS, Customer, EMPLOYEE_CLASS, Employee, JOB_CLASS, Job, PARAM_ACTIVE, PARAM_NAME,
    PARAM_OWNER, PARAM_REFERENCE, VENDOR_CLASS, Vendor, register_party_classes,
};
