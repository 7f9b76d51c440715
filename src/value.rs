use std::any::Any;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Write};
use std::sync::Arc;
use rust_decimal::Decimal;
use crate::catalog::Interface;
use crate::null::Instance;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rational {
    pub numer: i64,
    pub denom: i64,
}

impl Default for Rational {
    fn default() -> Self {
        Self { numer: 0, denom: 1 }
    }
}

/// Arbitrary caller data carried through the conversion helpers untouched.
#[derive(Clone)]
pub struct Opaque(Arc<dyn Any + Send + Sync>);

impl Opaque {
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for Opaque {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Opaque({:p})", Arc::as_ptr(&self.0))
    }
}

impl PartialEq for Opaque {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// A message argument or result. `Nil` is the absent value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Complex(Complex),
    Rational(Rational),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Null(Instance),
    Opaque(Opaque),
}

impl Value {
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Opaque(Arc::new(value)))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_instance(&self) -> Option<&Instance> {
        match self {
            Value::Null(inst) => Some(inst),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_opaque<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Opaque(o) => o.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Type-identity check. Only null objects impersonating `T` pass.
    pub fn is_a<T: Interface>(&self) -> bool {
        self.as_instance().map(|inst| inst.is_a::<T>()).unwrap_or(false)
    }

    fn write_str_quoted(f: &mut Formatter, s: &str) -> std::fmt::Result {
        const QUOTE: char = '"';
        f.write_char(QUOTE)?;
        for c in s.chars() {
            if c == QUOTE || c == '\\' {
                f.write_char('\\')?;
            }
            f.write_char(c)?;
        }
        f.write_char(QUOTE)
    }

    fn write_list(f: &mut Formatter, items: &[Value]) -> std::fmt::Result {
        f.write_char('[')?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_char(']')
    }

    fn write_map(f: &mut Formatter, map: &BTreeMap<String, Value>) -> std::fmt::Result {
        f.write_char('{')?;
        for (i, (k, v)) in map.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            Self::write_str_quoted(f, k)?;
            write!(f, " => {v}")?;
        }
        f.write_char('}')
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(d) => write!(f, "{d:?}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Complex(c) => write!(f, "({}+{}i)", c.re, c.im),
            Value::Rational(r) => write!(f, "({}/{})", r.numer, r.denom),
            Value::Str(s) => Self::write_str_quoted(f, s),
            Value::List(items) => Self::write_list(f, items),
            Value::Map(map) => Self::write_map(f, map),
            Value::Null(inst) => write!(f, "{inst}"),
            Value::Opaque(o) => write!(f, "{o:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<Complex> for Value {
    fn from(value: Complex) -> Self {
        Self::Complex(value)
    }
}

impl From<Rational> for Value {
    fn from(value: Rational) -> Self {
        Self::Rational(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(value: BTreeMap<String, Value>) -> Self {
        Self::Map(value)
    }
}

impl From<Instance> for Value {
    fn from(value: Instance) -> Self {
        Self::Null(value)
    }
}

impl<T> From<&T> for Value
where
    T: Into<Value> + Clone
{
    fn from(value: &T) -> Self {
        Into::<Value>::into(value.clone())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>
{
    fn from(value: Option<T>) -> Self {
        match value {
            None => Self::Nil,
            Some(value) => value.into()
        }
    }
}
