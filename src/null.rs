use std::any::TypeId;
use std::fmt::{Debug, Display};
use std::panic::Location;
use std::sync::Arc;
use crate::catalog::Interface;
use crate::compiler::{DispatchMode, TypeDescriptor};
use crate::trace::TraceRecord;
use crate::value::Value;
use crate::Result;

struct InstanceInner {
    descriptor: Arc<TypeDescriptor>,
    trace: Option<TraceRecord>,
}

/// A null object. Clones share identity; see [`Instance::ptr_eq`].
#[derive(Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

impl Instance {
    pub(crate) fn new(descriptor: Arc<TypeDescriptor>, origin: &Location<'_>) -> Self {
        let trace = if descriptor.traceable() {
            Some(TraceRecord::capture(origin))
        } else {
            None
        };
        Self {
            inner: Arc::new(InstanceInner { descriptor, trace })
        }
    }

    pub(crate) fn descriptor(&self) -> &TypeDescriptor {
        &self.inner.descriptor
    }

    /// Sends a message to the null object.
    #[track_caller]
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        self.inner.descriptor.dispatch(self, name, args, Location::caller())
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.inner.descriptor.responds_to(name)
    }

    pub fn type_name(&self) -> &str {
        self.inner.descriptor.name()
    }

    pub fn trace(&self) -> Option<&TraceRecord> {
        self.inner.trace.as_ref()
    }

    pub fn origin_file(&self) -> Option<&str> {
        self.trace().map(|t| t.file())
    }

    pub fn origin_line(&self) -> Option<u32> {
        self.trace().map(|t| t.line())
    }

    pub fn origin_column(&self) -> Option<u32> {
        self.trace().map(|t| t.column())
    }

    /// Succeeds only for types built with `impersonate::<T>()` (or a subtype of `T`).
    pub fn is_a<T: Interface>(&self) -> bool {
        match self.inner.descriptor.dispatch_mode() {
            DispatchMode::Impersonate(iface) => iface.is_subtype_of(TypeId::of::<T>()),
            _ => false,
        }
    }

    pub fn same_type(&self, other: &Instance) -> bool {
        self.inner.descriptor.id() == other.inner.descriptor.id()
    }

    pub fn ptr_eq(a: &Instance, b: &Instance) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    pub fn inspect(&self) -> String {
        match self.trace() {
            Some(t) => format!("<null:{}:{}>", t.file(), t.line()),
            None => "<null>".to_string(),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.same_type(other)
    }
}

impl Display for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inspect())
    }
}

impl Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Instance")
            .field("type", &self.type_name())
            .field("trace", &self.inner.trace)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{build, interface, Value};

    interface!(Shape { "area" });
    interface!(Square: Shape { "side" });

    #[test]
    fn test_equality() {
        let ty = build(|_| {});
        let a = ty.get();
        let b = ty.get();
        assert_eq!(a, b);
        assert!(!crate::Instance::ptr_eq(&a, &b));
        assert!(crate::Instance::ptr_eq(&a, &a.clone()));

        let other = build(|_| {}).get();
        assert_ne!(a, other);
        assert_eq!(Value::Bool(true), a.call("eq", &[Value::from(b.clone())]).unwrap());
        assert_eq!(Value::Bool(false), a.call("eq", &[Value::from(other.clone())]).unwrap());
        assert_eq!(Value::Bool(true), a.call("ne", &[Value::from(other)]).unwrap());
        assert_eq!(Value::Bool(false), a.call("eq", &[Value::Nil]).unwrap());
    }

    #[test]
    fn test_is_a() {
        let impersonator = build(|b| { b.impersonate::<Square>(); }).get();
        assert!(impersonator.is_a::<Square>());
        assert!(impersonator.is_a::<Shape>());
        assert!(Value::from(impersonator).is_a::<Shape>());

        let mimic = build(|b| { b.mimic::<Square>(); }).get();
        assert!(!mimic.is_a::<Square>());
        assert!(!mimic.is_a::<Shape>());
        assert!(!Value::Int(4).is_a::<Shape>());
    }

    #[test]
    fn test_inspect() {
        let plain = build(|_| {}).get();
        assert_eq!("<null>", plain.inspect());
        assert_eq!("<null>", plain.to_string());
        assert!(plain.trace().is_none());

        let traced = build(|b| { b.traceable(); }).get();
        let line = line!() - 1;
        assert_eq!(format!("<null:{}:{}>", file!(), line), traced.inspect());
    }
}
