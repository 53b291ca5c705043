use crate::{
    error::RegistryError,
    model::Book,
    query::{
        predicate::Predicate,
        registry::{CompareOptions, CoreRegistry, FieldValue},
    },
};
use std::{
    any::Any,
    cmp::Ordering,
    collections::{HashMap, hash_map::Entry},
    fmt,
    rc::Rc,
};

/// The universal identifier parameter every class is expected to expose.
pub const PARAM_GUID: &str = "guid";

///
/// ObjectHandle
///
/// Type-erased reference to a registered business object, produced by
/// object-reference parameters so queries can hop from one object class
/// to another.
///

#[derive(Clone)]
pub struct ObjectHandle {
    type_name: &'static str,
    object: Rc<dyn Any>,
}

impl ObjectHandle {
    pub fn new<O: 'static>(type_name: &'static str, object: Rc<O>) -> Self {
        Self {
            type_name,
            object,
        }
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn downcast<O: 'static>(&self) -> Option<Rc<O>> {
        Rc::clone(&self.object).downcast().ok()
    }

    fn as_any(&self) -> &dyn Any {
        self.object.as_ref()
    }
}

impl fmt::Debug for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

///
/// ParamValue
///
/// What evaluating one parameter yields: a scalar field for the core
/// types, or a handle to another registered object.
///

#[derive(Clone, Debug)]
pub enum ParamValue {
    Field(FieldValue),
    Object(ObjectHandle),
}

/// Parameter accessor. The book is the evaluation context; most getters
/// ignore it, derived parameters (e.g. the owner attached to a lot) need
/// it to resolve guids.
type Getter<O> = Box<dyn Fn(&O, &Book) -> Option<ParamValue>>;

///
/// ParamDef
///

struct ParamDef<O> {
    type_name: &'static str,
    getter: Getter<O>,
}

///
/// ObjectClass
///
/// One business-object type's queryable surface: an optional sort
/// comparator plus named typed parameters.
///

pub struct ObjectClass<O> {
    name: &'static str,
    sort: Option<Box<dyn Fn(&O, &O) -> Ordering>>,
    params: HashMap<&'static str, ParamDef<O>>,
}

impl<O: 'static> ObjectClass<O> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            sort: None,
            params: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: impl Fn(&O, &O) -> Ordering + 'static) -> Self {
        self.sort = Some(Box::new(sort));
        self
    }

    #[must_use]
    pub fn with_param(
        mut self,
        name: &'static str,
        type_name: &'static str,
        getter: impl Fn(&O, &Book) -> Option<ParamValue> + 'static,
    ) -> Self {
        self.params.insert(
            name,
            ParamDef {
                type_name,
                getter: Box::new(getter),
            },
        );
        self
    }
}

///
/// ErasedClass
///
/// Object classes are stored type-erased; every entry point re-checks the
/// concrete object type with a checked downcast.
///

trait ErasedClass {
    fn param_type(&self, param: &str) -> Option<&'static str>;

    fn eval(
        &self,
        object: &dyn Any,
        book: &Book,
        param: &'static str,
    ) -> Result<Option<ParamValue>, RegistryError>;

    fn sort_cmp(&self, left: &dyn Any, right: &dyn Any) -> Option<Ordering>;
}

impl<O: 'static> ErasedClass for ObjectClass<O> {
    fn param_type(&self, param: &str) -> Option<&'static str> {
        self.params.get(param).map(|def| def.type_name)
    }

    fn eval(
        &self,
        object: &dyn Any,
        book: &Book,
        param: &'static str,
    ) -> Result<Option<ParamValue>, RegistryError> {
        let object = object
            .downcast_ref::<O>()
            .ok_or(RegistryError::ClassTypeMismatch(self.name))?;
        let def = self.params.get(param).ok_or(RegistryError::UnknownParam {
            class: self.name,
            param,
        })?;

        Ok((def.getter)(object, book))
    }

    fn sort_cmp(&self, left: &dyn Any, right: &dyn Any) -> Option<Ordering> {
        let sort = self.sort.as_ref()?;
        let left = left.downcast_ref::<O>()?;
        let right = right.downcast_ref::<O>()?;

        Some(sort(left, right))
    }
}

///
/// ObjectRegistry
///
/// Class-name-keyed table of queryable object types. Registration is
/// first-wins, the same contract as the core-type registry.
///

#[derive(Default)]
pub struct ObjectRegistry {
    classes: HashMap<&'static str, Box<dyn ErasedClass>>,
}

impl ObjectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            classes: HashMap::new(),
        }
    }

    pub fn register<O: 'static>(&mut self, class: ObjectClass<O>) -> Result<(), RegistryError> {
        let name = class.name;
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }

        match self.classes.entry(name) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateClass(name)),
            Entry::Vacant(slot) => {
                slot.insert(Box::new(class));
                Ok(())
            }
        }
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// The declared type name of one parameter (a core type name or a
    /// registered object class name).
    #[must_use]
    pub fn param_type(&self, class: &str, param: &str) -> Option<&'static str> {
        self.classes.get(class)?.param_type(param)
    }

    /// Evaluate one parameter on one object.
    pub fn eval_param<O: 'static>(
        &self,
        book: &Book,
        object: &O,
        class: &'static str,
        param: &'static str,
    ) -> Result<Option<ParamValue>, RegistryError> {
        let entry = self
            .classes
            .get(class)
            .ok_or(RegistryError::UnknownClass(class))?;

        entry.eval(object, book, param)
    }

    /// Walk a parameter chain, hopping across object-reference parameters.
    ///
    /// The walk stops with `Ok(None)` when any hop yields nothing or a
    /// scalar field shows up before the last segment.
    pub fn eval_chain<O: 'static>(
        &self,
        book: &Book,
        object: &O,
        class: &'static str,
        path: &[&'static str],
    ) -> Result<Option<ParamValue>, RegistryError> {
        let Some((first, rest)) = path.split_first() else {
            return Ok(None);
        };

        let entry = self
            .classes
            .get(class)
            .ok_or(RegistryError::UnknownClass(class))?;
        let Some(mut current) = entry.eval(object, book, *first)? else {
            return Ok(None);
        };

        for &param in rest {
            let next = {
                let ParamValue::Object(handle) = &current else {
                    return Ok(None);
                };
                let entry = self
                    .classes
                    .get(handle.type_name())
                    .ok_or(RegistryError::UnknownClass(handle.type_name()))?;

                entry.eval(handle.as_any(), book, param)?
            };

            match next {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }

        Ok(Some(current))
    }

    /// Match one predicate against one parameter of one object.
    /// A parameter that yields nothing, or an object reference, does not
    /// match.
    pub fn matches<O: 'static>(
        &self,
        core: &CoreRegistry,
        book: &Book,
        object: &O,
        class: &'static str,
        param: &'static str,
        predicate: &Predicate,
    ) -> Result<bool, RegistryError> {
        match self.eval_param(book, object, class, param)? {
            Some(ParamValue::Field(value)) => Ok(core.matches(predicate, &value)),
            _ => Ok(false),
        }
    }

    /// Match one predicate at the end of a parameter chain.
    pub fn matches_chain<O: 'static>(
        &self,
        core: &CoreRegistry,
        book: &Book,
        object: &O,
        class: &'static str,
        path: &[&'static str],
        predicate: &Predicate,
    ) -> Result<bool, RegistryError> {
        match self.eval_chain(book, object, class, path)? {
            Some(ParamValue::Field(value)) => Ok(core.matches(predicate, &value)),
            _ => Ok(false),
        }
    }

    /// Compare two objects by one parameter, using the parameter's core
    /// type ordering. `Ok(None)` means the parameter is unorderable or
    /// absent on either side.
    pub fn compare<O: 'static>(
        &self,
        core: &CoreRegistry,
        book: &Book,
        left: &O,
        right: &O,
        class: &'static str,
        param: &'static str,
        options: CompareOptions,
    ) -> Result<Option<Ordering>, RegistryError> {
        let entry = self
            .classes
            .get(class)
            .ok_or(RegistryError::UnknownClass(class))?;
        let type_name = entry
            .param_type(param)
            .ok_or(RegistryError::UnknownParam { class, param })?;

        let left = entry.eval(left, book, param)?;
        let right = entry.eval(right, book, param)?;

        match (left, right) {
            (Some(ParamValue::Field(l)), Some(ParamValue::Field(r))) => {
                Ok(core.compare(type_name, &l, &r, options))
            }
            _ => Ok(None),
        }
    }

    /// Whole-object comparison via the class's registered sort comparator.
    pub fn sort_cmp<O: 'static>(
        &self,
        class: &'static str,
        left: &O,
        right: &O,
    ) -> Result<Option<Ordering>, RegistryError> {
        let entry = self
            .classes
            .get(class)
            .ok_or(RegistryError::UnknownClass(class))?;

        Ok(entry.sort_cmp(left, right))
    }
}
