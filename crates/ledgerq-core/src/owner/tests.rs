use crate::{
    kvp::KvpValue,
    model::{
        Book, Customer, Employee, Job, LOT_CLASS, Lot, PARAM_NAME, PARAM_OWNER, Vendor,
        register_party_classes,
    },
    owner::{
        LotAttachError, OWNER_CLASS, OWNER_FRAME_KEY, OWNER_GUID_KEY, OWNER_TYPE_KEY, Owner,
        OwnerFromLotError, OwnerType, PARAM_PARENT_GUID, PARAM_TYPE, register_owner_class,
    },
    query::{
        CompareHow, CoreRegistry, GuidMatch, ObjectRegistry, ParamValue, Predicate, TextMode,
        registry::FieldValue,
    },
    types::{Commodity, Guid},
};
use std::{cmp::Ordering, rc::Rc};

// ---- helpers -----------------------------------------------------------

fn eur() -> Commodity {
    Commodity::currency("EUR")
}

struct Fixture {
    book: Book,
    customer: Rc<Customer>,
    vendor: Rc<Vendor>,
    employee: Rc<Employee>,
    job: Rc<Job>,
}

fn fixture() -> Fixture {
    let customer = Rc::new(Customer::new("Acme Tooling", eur()));
    let vendor = Rc::new(Vendor::new("Initech Supply", eur()));
    let employee = Rc::new(Employee::new("mallory", eur()));
    let job = Rc::new(Job::new("Q3 refit", Owner::Vendor(Rc::clone(&vendor))));

    let mut book = Book::new();
    book.insert_customer(Rc::clone(&customer));
    book.insert_vendor(Rc::clone(&vendor));
    book.insert_employee(Rc::clone(&employee));
    book.insert_job(Rc::clone(&job));

    Fixture {
        book,
        customer,
        vendor,
        employee,
        job,
    }
}

fn registries() -> (CoreRegistry, ObjectRegistry) {
    let core = CoreRegistry::bootstrap();
    let mut objects = ObjectRegistry::new();
    register_party_classes(&mut objects).unwrap();
    register_owner_class(&mut objects).unwrap();

    (core, objects)
}

// ---- tags and narrowing ------------------------------------------------

#[test]
fn tag_exclusivity() {
    let customer = Rc::new(Customer::new("Acme", eur()));
    let owner = Owner::Customer(Rc::clone(&customer));

    assert_eq!(owner.owner_type(), OwnerType::Customer);
    assert!(owner.vendor().is_none());
    assert!(owner.job().is_none());
    assert!(owner.employee().is_none());
    assert!(Rc::ptr_eq(&owner.customer().unwrap(), &customer));
}

#[test]
fn none_and_undefined_expose_nothing() {
    let none = Owner::None;
    assert_eq!(none.owner_type(), OwnerType::None);
    assert!(!none.is_valid());
    assert!(none.guid().is_none());
    assert!(none.name().is_none());
    assert!(none.end_owner().is_none());

    let undefined = Owner::Undefined(Rc::new("opaque payload"));
    assert_eq!(undefined.owner_type(), OwnerType::Undefined);
    assert!(undefined.is_valid());
    assert!(undefined.guid().is_none());
    assert!(undefined.currency().is_none());
}

#[test]
fn default_owner_is_none() {
    assert_eq!(Owner::default().owner_type(), OwnerType::None);
}

// ---- end-owner and currency resolution ---------------------------------

#[test]
fn job_resolves_to_its_vendor() {
    let f = fixture();
    let owner = Owner::Job(Rc::clone(&f.job));

    let end = owner.end_owner().unwrap();
    assert_eq!(end.owner_type(), OwnerType::Vendor);
    assert!(Rc::ptr_eq(&end.vendor().unwrap(), &f.vendor));

    assert_eq!(owner.end_guid(), Some(f.vendor.guid()));
    assert_eq!(owner.currency(), Some(eur()));
    assert_eq!(owner.name(), Some("Q3 refit"));
}

#[test]
fn leaf_owner_resolves_to_itself() {
    let f = fixture();
    let owner = Owner::Employee(Rc::clone(&f.employee));

    let end = owner.end_owner().unwrap();
    assert!(Owner::ptr_equal(&end, &owner));
    assert_eq!(owner.end_guid(), owner.guid());
}

// ---- ordering and identity ---------------------------------------------

#[test]
fn compare_orders_tags_then_domain() {
    let f = fixture();
    let acme = Owner::Customer(Rc::clone(&f.customer));
    let zeta = Owner::Customer(Rc::new(Customer::new("Zeta Freight", eur())));
    let vendor = Owner::Vendor(Rc::clone(&f.vendor));

    assert_eq!(Owner::compare(&Owner::None, &acme), Ordering::Less);
    assert_eq!(Owner::compare(&acme, &zeta), Ordering::Less);
    assert_eq!(Owner::compare(&acme, &vendor), Ordering::Less);
    assert_eq!(Owner::compare(&acme, &acme), Ordering::Equal);
    assert_eq!(Owner::compare(&Owner::None, &Owner::None), Ordering::Equal);
}

#[test]
fn ptr_equal_is_handle_identity() {
    let f = fixture();
    let owner = Owner::Customer(Rc::clone(&f.customer));
    let same_handle = owner.clone();
    // Same fields, different object.
    let twin = Owner::Customer(Rc::new(Customer::with_guid(
        f.customer.guid(),
        f.customer.name(),
        eur(),
    )));

    assert!(Owner::ptr_equal(&owner, &same_handle));
    assert!(!Owner::ptr_equal(&owner, &twin));
    assert!(!Owner::ptr_equal(&owner, &Owner::Vendor(Rc::clone(&f.vendor))));
    assert!(Owner::ptr_equal(&Owner::None, &Owner::None));
}

// ---- lot persistence ---------------------------------------------------

#[test]
fn lot_round_trip_for_all_persistable_kinds() {
    let f = fixture();
    let owners = [
        Owner::Customer(Rc::clone(&f.customer)),
        Owner::Job(Rc::clone(&f.job)),
        Owner::Vendor(Rc::clone(&f.vendor)),
        Owner::Employee(Rc::clone(&f.employee)),
    ];

    for owner in owners {
        let mut lot = Lot::new();
        owner.attach_to_lot(&mut lot).unwrap();

        let restored = Owner::from_lot(&f.book, &lot).unwrap();
        assert_eq!(restored.owner_type(), owner.owner_type());
        assert_eq!(restored.guid(), owner.guid());
        assert!(Owner::ptr_equal(&restored, &owner));
    }
}

#[test]
fn lot_encoding_is_stable() {
    let f = fixture();
    let cases = [
        (Owner::Customer(Rc::clone(&f.customer)), 2),
        (Owner::Job(Rc::clone(&f.job)), 3),
        (Owner::Vendor(Rc::clone(&f.vendor)), 4),
        (Owner::Employee(Rc::clone(&f.employee)), 5),
    ];

    for (owner, tag) in cases {
        let mut lot = Lot::new();
        owner.attach_to_lot(&mut lot).unwrap();

        assert_eq!(
            lot.kvp().get_path(&[OWNER_FRAME_KEY, OWNER_TYPE_KEY]),
            Some(&KvpValue::Int64(tag))
        );
        assert_eq!(
            lot.kvp().get_path(&[OWNER_FRAME_KEY, OWNER_GUID_KEY]),
            Some(&KvpValue::Guid(owner.guid().unwrap()))
        );
    }
}

#[test]
fn unattachable_owners_are_rejected() {
    let mut lot = Lot::new();

    assert!(matches!(
        Owner::None.attach_to_lot(&mut lot),
        Err(LotAttachError::NotAttachable(OwnerType::None))
    ));
    assert!(matches!(
        Owner::Undefined(Rc::new(())).attach_to_lot(&mut lot),
        Err(LotAttachError::NotAttachable(OwnerType::Undefined))
    ));
    assert!(lot.kvp().is_empty());
}

#[test]
fn from_lot_reports_each_failure() {
    let f = fixture();

    let empty = Lot::new();
    assert_eq!(
        Owner::from_lot(&f.book, &empty).unwrap_err(),
        OwnerFromLotError::MissingTypeSlot
    );

    let mut type_only = Lot::new();
    type_only
        .kvp_mut()
        .set_path(&[OWNER_FRAME_KEY, OWNER_TYPE_KEY], KvpValue::Int64(2))
        .unwrap();
    assert_eq!(
        Owner::from_lot(&f.book, &type_only).unwrap_err(),
        OwnerFromLotError::MissingGuidSlot
    );

    let mut bad_tag = Lot::new();
    bad_tag
        .kvp_mut()
        .set_path(&[OWNER_FRAME_KEY, OWNER_TYPE_KEY], KvpValue::Int64(99))
        .unwrap();
    assert_eq!(
        Owner::from_lot(&f.book, &bad_tag).unwrap_err(),
        OwnerFromLotError::UnknownTypeTag(99)
    );

    let mut unpersistable = Lot::new();
    unpersistable
        .kvp_mut()
        .set_path(&[OWNER_FRAME_KEY, OWNER_TYPE_KEY], KvpValue::Int64(0))
        .unwrap();
    unpersistable
        .kvp_mut()
        .set_path(
            &[OWNER_FRAME_KEY, OWNER_GUID_KEY],
            KvpValue::Guid(f.customer.guid()),
        )
        .unwrap();
    assert_eq!(
        Owner::from_lot(&f.book, &unpersistable).unwrap_err(),
        OwnerFromLotError::UnpersistableType(OwnerType::None)
    );

    let stranger = Guid::new_random();
    let mut dangling = Lot::new();
    dangling
        .kvp_mut()
        .set_path(&[OWNER_FRAME_KEY, OWNER_TYPE_KEY], KvpValue::Int64(2))
        .unwrap();
    dangling
        .kvp_mut()
        .set_path(&[OWNER_FRAME_KEY, OWNER_GUID_KEY], KvpValue::Guid(stranger))
        .unwrap();
    assert_eq!(
        Owner::from_lot(&f.book, &dangling).unwrap_err(),
        OwnerFromLotError::UnresolvedGuid {
            owner_type: OwnerType::Customer,
            guid: stranger,
        }
    );
}

// ---- query registration ------------------------------------------------

#[test]
fn owner_params_are_queryable() {
    let f = fixture();
    let (core, objects) = registries();
    let owner = Owner::Customer(Rc::clone(&f.customer));

    let named = Predicate::string(CompareHow::Equal, TextMode::Cs, "Acme", false).unwrap();
    assert!(
        objects
            .matches(&core, &f.book, &owner, OWNER_CLASS, PARAM_NAME, &named)
            .unwrap()
    );

    let customer_tag = Predicate::int64(CompareHow::Equal, OwnerType::Customer.as_i64());
    assert!(
        objects
            .matches(&core, &f.book, &owner, OWNER_CLASS, PARAM_TYPE, &customer_tag)
            .unwrap()
    );

    // A job's parent guid is the guid of the party it belongs to.
    let job_owner = Owner::Job(Rc::clone(&f.job));
    let parent = Predicate::guid(GuidMatch::Any, vec![f.vendor.guid()]);
    assert!(
        objects
            .matches(
                &core,
                &f.book,
                &job_owner,
                OWNER_CLASS,
                PARAM_PARENT_GUID,
                &parent
            )
            .unwrap()
    );
}

#[test]
fn lot_owner_chain_walks_to_the_party() {
    let f = fixture();
    let (core, objects) = registries();

    let mut lot = Lot::new();
    Owner::Customer(Rc::clone(&f.customer))
        .attach_to_lot(&mut lot)
        .unwrap();

    let named = Predicate::string(CompareHow::Equal, TextMode::Cs, "Acme", false).unwrap();
    assert!(
        objects
            .matches_chain(
                &core,
                &f.book,
                &lot,
                LOT_CLASS,
                &[PARAM_OWNER, PARAM_NAME],
                &named
            )
            .unwrap()
    );

    // The intermediate hop is a live owner value, not shared scratch state.
    let step = objects
        .eval_chain(&f.book, &lot, LOT_CLASS, &[PARAM_OWNER, PARAM_TYPE])
        .unwrap();
    assert!(matches!(
        step,
        Some(ParamValue::Field(FieldValue::Int64(2)))
    ));

    let hop = objects
        .eval_param(&f.book, &lot, LOT_CLASS, PARAM_OWNER)
        .unwrap();
    let Some(ParamValue::Object(handle)) = hop else {
        panic!("attached lot must yield an owner handle");
    };
    let resolved = handle.downcast::<Owner>().unwrap();
    assert!(Rc::ptr_eq(&resolved.customer().unwrap(), &f.customer));

    // A lot with no attached owner matches nothing through the chain.
    let bare = Lot::new();
    assert!(
        !objects
            .matches_chain(
                &core,
                &f.book,
                &bare,
                LOT_CLASS,
                &[PARAM_OWNER, PARAM_NAME],
                &named
            )
            .unwrap()
    );
}

#[test]
fn owner_sort_uses_domain_comparator() {
    let f = fixture();
    let (_, objects) = registries();

    let acme = Owner::Customer(Rc::clone(&f.customer));
    let vendor = Owner::Vendor(Rc::clone(&f.vendor));

    assert_eq!(
        objects.sort_cmp(OWNER_CLASS, &acme, &vendor).unwrap(),
        Some(Ordering::Less)
    );
    assert_eq!(
        objects.sort_cmp(OWNER_CLASS, &acme, &acme).unwrap(),
        Some(Ordering::Equal)
    );
}
