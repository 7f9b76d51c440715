use std::panic::Location;
use std::sync::Arc;
use log::trace;
use once_cell::sync::OnceCell;
use serde::Serialize;
use crate::compiler::{TypeDescriptor, TypeSummary};
use crate::conversions::Conversions;
use crate::error::Error;
use crate::null::Instance;
use crate::value::Value;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lifecycle {
    Plain,
    Singleton,
}

/// Holds the one instance of a singleton type. Created lazily on first access.
struct SingletonHolder {
    cell: OnceCell<Instance>,
}

impl SingletonHolder {
    fn new() -> Self {
        SingletonHolder {
            cell: OnceCell::new(),
        }
    }

    fn get_or_create(&self, descriptor: &Arc<TypeDescriptor>, origin: &Location<'_>) -> Instance {
        self.cell
            .get_or_init(|| {
                trace!("Creating singleton instance of {}", descriptor.name());
                Instance::new(Arc::clone(descriptor), origin)
            })
            .clone()
    }
}

/// A compiled null type.
///
/// Clones refer to the same type and, for singletons, share the one instance.
#[derive(Clone)]
pub struct NullType {
    descriptor: Arc<TypeDescriptor>,
    singleton: Arc<SingletonHolder>,
}

impl NullType {
    pub(crate) fn from_descriptor(descriptor: TypeDescriptor) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            singleton: Arc::new(SingletonHolder::new()),
        }
    }

    /// Constructs a fresh instance. Fails for singleton types.
    #[track_caller]
    pub fn new(&self) -> Result<Instance> {
        match self.descriptor.lifecycle() {
            Lifecycle::Plain => Ok(Instance::new(Arc::clone(&self.descriptor), Location::caller())),
            Lifecycle::Singleton => Err(Error::illegal_construction(self.name())),
        }
    }

    /// The shared instance of a singleton type. Fails for plain types.
    #[track_caller]
    pub fn instance(&self) -> Result<Instance> {
        match self.descriptor.lifecycle() {
            Lifecycle::Singleton => Ok(self.singleton.get_or_create(&self.descriptor, Location::caller())),
            Lifecycle::Plain => Err(Error::illegal_accessor(self.name())),
        }
    }

    /// A usable instance whatever the lifecycle.
    #[track_caller]
    pub fn get(&self) -> Instance {
        let origin = Location::caller();
        match self.descriptor.lifecycle() {
            Lifecycle::Plain => Instance::new(Arc::clone(&self.descriptor), origin),
            Lifecycle::Singleton => self.singleton.get_or_create(&self.descriptor, origin),
        }
    }

    pub fn conversions(&self) -> Conversions<'_> {
        Conversions::new(self)
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.descriptor.lifecycle()
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub fn describe(&self) -> TypeSummary {
        self.descriptor.summary()
    }

    pub fn is_instance(&self, inst: &Instance) -> bool {
        inst.descriptor().id() == self.descriptor.id()
    }

    /// True when `value` holds an instance of this type.
    pub fn owns(&self, value: &Value) -> bool {
        value.as_instance().map(|inst| self.is_instance(inst)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;
    use crate::{build, ErrorKind, Instance};
    use super::Lifecycle;

    #[test]
    fn test_plain() {
        let ty = build(|_| {});
        assert_eq!(Lifecycle::Plain, ty.lifecycle());
        let a = ty.new().unwrap();
        let b = ty.new().unwrap();
        assert!(!Instance::ptr_eq(&a, &b));
        assert!(ty.is_instance(&a));

        let err = ty.instance().unwrap_err();
        assert_eq!(ErrorKind::IllegalAccessor, err.kind());
        assert!(ty.is_instance(&ty.get()));
    }

    #[test]
    fn test_singleton() {
        let ty = build(|b| { b.singleton(); });
        assert_eq!(Lifecycle::Singleton, ty.lifecycle());
        let a = ty.instance().unwrap();
        let b = ty.instance().unwrap();
        assert!(Instance::ptr_eq(&a, &b));
        assert!(Instance::ptr_eq(&a, &ty.get()));
        assert!(Instance::ptr_eq(&a, &ty.clone().get()));

        let err = ty.new().unwrap_err();
        assert_eq!(ErrorKind::IllegalConstruction, err.kind());
        assert!(err.desc().contains("NullObject"));
    }

    #[test]
    fn test_singleton_per_type() {
        let first = build(|b| { b.singleton(); });
        let second = build(|b| { b.singleton(); });
        assert!(!Instance::ptr_eq(&first.get(), &second.get()));
        assert!(!second.is_instance(&first.get()));
    }

    #[test]
    fn test_singleton_concurrent_first_access() {
        let ty = build(|b| { b.singleton(); });
        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ty = ty.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    ty.instance().unwrap()
                })
            })
            .collect();

        let instances: Vec<Instance> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for inst in instances.iter() {
            assert!(Instance::ptr_eq(&instances[0], inst));
        }
    }

    #[test]
    fn test_traced_singleton_keeps_first_origin() {
        let ty = build(|b| { b.singleton().traceable(); });
        let first = ty.get(); let line = line!();
        let again = ty.instance().unwrap();
        assert_eq!(Some(line), again.origin_line());
        assert_eq!(Some(file!()), again.origin_file());
        assert!(Instance::ptr_eq(&first, &again));
    }

    #[test]
    fn test_traced_construction() {
        let ty = build(|b| { b.traceable(); });
        let inst = ty.new().unwrap(); let line = line!();
        assert_eq!(Some(file!()), inst.origin_file());
        assert_eq!(Some(line), inst.origin_line());
        assert!(inst.trace().is_some());
    }
}
