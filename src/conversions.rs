//! Moving between absent values and null objects.
//!
//! Each helper is bound to one [`NullType`]: only instances of that type
//! count as "null" and the canonical instance always comes from
//! [`NullType::get`]. Besides [`Value::Nil`], any value registered with
//! `Builder::null_equivalent` counts as absent.

use crate::error::Error;
use crate::lifecycle::NullType;
use crate::null::Instance;
use crate::value::Value;
use crate::Result;

fn is_null(ty: &NullType, value: &Value) -> bool {
    ty.descriptor().is_null_equivalent(value) || ty.owns(value)
}

/// Absent becomes the null object; anything else passes through.
#[track_caller]
pub fn maybe(ty: &NullType, value: impl Into<Value>) -> Value {
    let value = value.into();
    if ty.owns(&value) {
        value
    } else if ty.descriptor().is_null_equivalent(&value) {
        Value::Null(ty.get())
    } else {
        value
    }
}

#[track_caller]
pub fn maybe_with<F>(ty: &NullType, thunk: F) -> Value
where
    F: FnOnce() -> Value
{
    maybe(ty, thunk())
}

/// Passes real values through and rejects absent values and null objects.
pub fn just(ty: &NullType, value: impl Into<Value>) -> Result<Value> {
    let value = value.into();
    if is_null(ty, &value) {
        Err(Error::argument(ty.name(), value))
    } else {
        Ok(value)
    }
}

/// The canonical null object.
#[track_caller]
pub fn null(ty: &NullType) -> Instance {
    ty.get()
}

/// The canonical null object, for an absent value or a null object only.
#[track_caller]
pub fn null_from(ty: &NullType, value: impl Into<Value>) -> Result<Instance> {
    match value.into() {
        Value::Null(inst) if ty.is_instance(&inst) => Ok(inst),
        value if ty.descriptor().is_null_equivalent(&value) => Ok(ty.get()),
        value => Err(Error::argument(ty.name(), value)),
    }
}

/// Absent values and null objects become [`Value::Nil`].
pub fn actual(ty: &NullType, value: impl Into<Value>) -> Value {
    let value = value.into();
    if is_null(ty, &value) {
        Value::Nil
    } else {
        value
    }
}

pub fn actual_with<F>(ty: &NullType, thunk: F) -> Value
where
    F: FnOnce() -> Value
{
    actual(ty, thunk())
}

/// The conversion helpers of one null type. See [`NullType::conversions`].
#[derive(Clone, Copy)]
pub struct Conversions<'a> {
    ty: &'a NullType,
}

impl<'a> Conversions<'a> {
    pub(crate) fn new(ty: &'a NullType) -> Self {
        Self { ty }
    }

    #[track_caller]
    pub fn maybe(&self, value: impl Into<Value>) -> Value {
        maybe(self.ty, value)
    }

    #[track_caller]
    pub fn maybe_with<F: FnOnce() -> Value>(&self, thunk: F) -> Value {
        maybe_with(self.ty, thunk)
    }

    pub fn just(&self, value: impl Into<Value>) -> Result<Value> {
        just(self.ty, value)
    }

    #[track_caller]
    pub fn null(&self) -> Instance {
        null(self.ty)
    }

    #[track_caller]
    pub fn null_from(&self, value: impl Into<Value>) -> Result<Instance> {
        null_from(self.ty, value)
    }

    pub fn actual(&self, value: impl Into<Value>) -> Value {
        actual(self.ty, value)
    }

    pub fn actual_with<F: FnOnce() -> Value>(&self, thunk: F) -> Value {
        actual_with(self.ty, thunk)
    }
}
