//! The fixed catalog of behaviors a null type can be built from, plus the
//! static method tables the compiler draws on.

use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt::Debug;
use rust_decimal::Decimal;
use crate::value::{Complex, Rational, Value};

/// A reference type whose public method names can be mimicked or impersonated.
///
/// Usually declared with [`interface!`](crate::interface).
pub trait Interface: 'static {
    fn name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Public method names declared directly on this type.
    fn methods() -> &'static [&'static str];

    fn supertypes() -> Vec<InterfaceRef> {
        Vec::new()
    }
}

/// Type-erased handle on an [`Interface`] implementor.
#[derive(Clone, Copy)]
pub struct InterfaceRef {
    type_id: TypeId,
    name: fn() -> &'static str,
    methods: fn() -> &'static [&'static str],
    supertypes: fn() -> Vec<InterfaceRef>,
}

impl InterfaceRef {
    pub fn of<T: Interface>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: T::name,
            methods: T::methods,
            supertypes: T::supertypes,
        }
    }

    pub fn name(&self) -> &'static str {
        (self.name)()
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Declared methods followed by those of every supertype, deduplicated.
    /// Each interface is visited once, so cyclic declarations terminate.
    pub fn all_methods(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        let mut visited = Vec::new();
        self.collect_methods(&mut out, &mut visited);
        out
    }

    fn collect_methods(&self, out: &mut Vec<&'static str>, visited: &mut Vec<TypeId>) {
        if visited.contains(&self.type_id) {
            return;
        }
        visited.push(self.type_id);
        for m in (self.methods)() {
            if !out.contains(m) {
                out.push(*m);
            }
        }
        for sup in (self.supertypes)() {
            sup.collect_methods(out, visited);
        }
    }

    /// True when `type_id` is this interface or one of its supertypes.
    pub fn is_subtype_of(&self, type_id: TypeId) -> bool {
        self.find_supertype(type_id, &mut Vec::new())
    }

    fn find_supertype(&self, type_id: TypeId, visited: &mut Vec<TypeId>) -> bool {
        if self.type_id == type_id {
            return true;
        }
        if visited.contains(&self.type_id) {
            return false;
        }
        visited.push(self.type_id);
        (self.supertypes)().iter().any(|sup| sup.find_supertype(type_id, visited))
    }
}

impl Debug for InterfaceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InterfaceRef({})", self.name())
    }
}

impl PartialEq for InterfaceRef {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

/// Declares a unit struct implementing [`Interface`].
///
/// ```
/// use null_object::interface;
///
/// interface!(pub Reader { "read", "close" });
/// interface!(pub Buffered: Reader { "fill_buf", "eof?" });
/// ```
#[macro_export]
macro_rules! interface {
    ($vis:vis $name:ident $(: $($sup:ty),+)? { $($method:literal),* $(,)? }) => {
        $vis struct $name;

        impl $crate::Interface for $name {
            fn name() -> &'static str {
                stringify!($name)
            }

            fn methods() -> &'static [&'static str] {
                &[$($method),*]
            }

            fn supertypes() -> ::std::vec::Vec<$crate::InterfaceRef> {
                ::std::vec![$($($crate::InterfaceRef::of::<$sup>()),+)?]
            }
        }
    };
}

/// One entry in a builder's configuration. Later entries override earlier
/// ones touching the same concern.
#[derive(Debug, Clone, PartialEq)]
pub enum TraitSelection {
    Strict,
    BlackHole,
    Mimic(InterfaceRef),
    Impersonate(InterfaceRef),
    Plain,
    Singleton,
    Traceable,
    ExplicitConversions,
    ImplicitConversions,
    Pebble,
}

/// What a mimicked method returns.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum NullReturn {
    #[default]
    Absent,
    Itself,
    Value(Value),
}

pub const EQ: &str = "eq";
pub const NE: &str = "ne";
pub const INSPECT: &str = "inspect";
pub const TO_S: &str = "to_s";
pub const TO_BOOL: &str = "to_bool";

/// Methods every generated type defines.
pub const CORE_METHODS: &[&str] = &[EQ, NE, INSPECT, TO_S, TO_BOOL];

pub type ConversionFn = fn() -> Value;

fn empty_str() -> Value {
    Value::Str(String::new())
}

fn zero_int() -> Value {
    Value::Int(0)
}

fn zero_float() -> Value {
    Value::Float(0.0)
}

fn empty_list() -> Value {
    Value::List(Vec::new())
}

fn empty_map() -> Value {
    Value::Map(BTreeMap::new())
}

fn zero_complex() -> Value {
    Value::Complex(Complex::default())
}

fn zero_rational() -> Value {
    Value::Rational(Rational::default())
}

fn zero_decimal() -> Value {
    Value::Decimal(Decimal::ZERO)
}

pub const EXPLICIT_CONVERSIONS: &[(&str, ConversionFn)] = &[
    ("to_s", empty_str),
    ("to_i", zero_int),
    ("to_f", zero_float),
    ("to_a", empty_list),
    ("to_h", empty_map),
    ("to_c", zero_complex),
    ("to_r", zero_rational),
    ("to_d", zero_decimal),
];

pub const IMPLICIT_CONVERSIONS: &[(&str, ConversionFn)] = &[
    ("to_str", empty_str),
    ("to_ary", empty_list),
];

/// Names a black hole refuses to swallow unless something defines them.
pub fn default_exemptions() -> Vec<&'static str> {
    CORE_METHODS
        .iter()
        .chain(IMPLICIT_CONVERSIONS.iter().map(|(name, _)| name))
        .copied()
        .collect()
}

pub fn is_predicate(name: &str) -> bool {
    name.ends_with('?')
}
