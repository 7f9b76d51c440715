//! Null object types assembled from a fixed catalog of behaviors.
//!
//! ```
//! use null_object::{build, interface, Value};
//!
//! interface!(Logger { "log", "flush" });
//!
//! let null_logger = build(|b| {
//!     b.name("NullLogger").mimic::<Logger>().singleton();
//! });
//! let logger = null_logger.get();
//! assert_eq!(Value::Nil, logger.call("log", &[Value::from("hello")]).unwrap());
//! assert!(logger.call("rotate", &[]).is_err());
//! ```

pub mod builder;
pub mod catalog;
pub mod compiler;
pub mod conversions;
pub mod error;
pub mod lifecycle;
pub mod null;
pub mod trace;
pub mod value;

pub use builder::{build, Builder};
pub use catalog::{Interface, InterfaceRef, NullReturn, TraitSelection};
pub use compiler::{DispatchMode, TypeDescriptor, TypeSummary};
pub use conversions::Conversions;
pub use error::{Error, ErrorKind};
pub use lifecycle::{Lifecycle, NullType};
pub use null::Instance;
pub use trace::TraceRecord;
pub use value::{Complex, Rational, Value};

pub type Result<T, E = error::Error> = core::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use rust_decimal::Decimal;
    use crate::*;

    interface!(Repository { "find", "save", "exists?" });
    interface!(UserRepository: Repository { "find_by_email" });

    #[test]
    fn test_black_hole_singleton() {
        let ty = build(|b| {
            b.black_hole()
                .singleton()
                .traceable();
        });
        let null = ty.instance().unwrap();
        let result = null
            .call("a", &[]).unwrap()
            .as_instance().unwrap()
            .call("b", &[]).unwrap()
            .as_instance().unwrap()
            .call("c", &[]).unwrap();
        assert!(Instance::ptr_eq(&null, result.as_instance().unwrap()));
        assert_eq!(ErrorKind::IllegalConstruction, ty.new().unwrap_err().kind());
    }

    #[test]
    fn test_explicit_conversions() {
        let ty = build(|b| { b.black_hole().explicit_conversions(); });
        let null = ty.get();
        assert_eq!(Value::Str(String::new()), null.call("to_s", &[]).unwrap());
        assert_eq!(Value::Int(0), null.call("to_i", &[]).unwrap());
        assert_eq!(Value::Float(0.0), null.call("to_f", &[]).unwrap());
        assert_eq!(Value::List(vec![]), null.call("to_a", &[]).unwrap());
        assert_eq!(Value::Map(BTreeMap::new()), null.call("to_h", &[]).unwrap());
        assert_eq!(Value::Complex(Complex { re: 0.0, im: 0.0 }), null.call("to_c", &[]).unwrap());
        assert_eq!(Value::Rational(Rational { numer: 0, denom: 1 }), null.call("to_r", &[]).unwrap());
        assert_eq!(Value::Decimal(Decimal::ZERO), null.call("to_d", &[]).unwrap());
        assert_eq!(ErrorKind::UnknownMethod, null.call("to_str", &[]).unwrap_err().kind());
    }

    #[test]
    fn test_conversions_off_by_default() {
        let null = build(|_| {}).get();
        assert_eq!(ErrorKind::UnknownMethod, null.call("to_i", &[]).unwrap_err().kind());
        assert_eq!(Value::Str(String::new()), null.call("to_s", &[]).unwrap());
    }

    #[test]
    fn test_implicit_conversions() {
        let null = build(|b| { b.implicit_conversions(); }).get();
        assert_eq!(Value::Str(String::new()), null.call("to_str", &[]).unwrap());
        assert_eq!(Value::List(vec![]), null.call("to_ary", &[]).unwrap());
        assert_eq!(ErrorKind::UnknownMethod, null.call("to_i", &[]).unwrap_err().kind());
    }

    #[test]
    fn test_impersonate_repository() {
        let ty = build(|b| {
            b.name("NullUserRepository")
                .impersonate::<UserRepository>()
                .predicates_return(false)
                .define("find", |null, _| Ok(Value::from(null.clone())));
        });
        let repo = ty.get();
        assert!(repo.is_a::<UserRepository>());
        assert!(repo.is_a::<Repository>());
        assert_eq!(Value::Nil, repo.call("find_by_email", &[Value::from("a@b.c")]).unwrap());
        assert_eq!(Value::Bool(false), repo.call("exists?", &[]).unwrap());
        assert!(ty.owns(&repo.call("find", &[Value::Int(1)]).unwrap()));

        let err = repo.call("delete", &[]).unwrap_err();
        assert_eq!(ErrorKind::UnknownMethod, err.kind());
        assert!(err.desc().contains("NullUserRepository"));
    }

    #[test]
    fn test_conversions_namespace_per_type() {
        let users = build(|b| { b.name("NullUser"); });
        let orders = build(|b| { b.name("NullOrder"); });

        let user = users.get();
        assert_eq!(Value::Nil, users.conversions().actual(user.clone()));
        assert_eq!(Value::from(user.clone()), orders.conversions().actual(user.clone()));
        assert!(orders.conversions().just(user).is_ok());

        let err = users.conversions().just(Value::Nil).unwrap_err();
        assert!(err.to_string().contains("NullUser"));
    }

    #[test]
    fn test_pebble_passes_results_through() {
        let ty = build(|b| { b.pebble().black_hole(); });
        let null = ty.get();
        assert!(ty.descriptor().pebble());
        assert!(ty.owns(&null.call("log_me", &[Value::Int(1), Value::from("two")]).unwrap()));
        assert_eq!(Value::Bool(false), null.call("to_bool", &[]).unwrap());
    }
}
