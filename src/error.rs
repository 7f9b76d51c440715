use std::fmt::Display;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnknownMethod,
    IllegalConstruction,
    IllegalAccessor,
    Argument,
    Custom,
}

#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    desc: String,
    value: Option<Value>,
}

impl Error {
    pub fn new(kind: ErrorKind, desc: impl AsRef<str>) -> Self {
        Self {
            kind,
            desc: desc.as_ref().to_string(),
            value: None,
        }
    }

    pub fn from_message(desc: impl AsRef<str>) -> Self {
        Self::new(ErrorKind::Custom, desc)
    }

    pub fn unknown_method(type_name: &str, method: &str) -> Self {
        Self::new(
            ErrorKind::UnknownMethod,
            format!("undefined method `{}` for {}", method, type_name))
    }

    pub fn illegal_construction(type_name: &str) -> Self {
        Self::new(
            ErrorKind::IllegalConstruction,
            format!("{} is a singleton; use instance() or get()", type_name))
    }

    pub fn illegal_accessor(type_name: &str) -> Self {
        Self::new(
            ErrorKind::IllegalAccessor,
            format!("{} is not a singleton; use new() or get()", type_name))
    }

    pub fn argument(type_name: &str, value: Value) -> Self {
        Self {
            kind: ErrorKind::Argument,
            desc: format!("{} rejects value {}", type_name, value),
            value: Some(value),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn desc(&self) -> &str {
        &self.desc
    }

    /// The rejected value, for argument errors.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ErrorKind::UnknownMethod => { write!(f, "Unknown method error")?; },
            ErrorKind::IllegalConstruction => { write!(f, "Illegal construction error")?; },
            ErrorKind::IllegalAccessor => { write!(f, "Illegal accessor error")?; },
            ErrorKind::Argument => { write!(f, "Argument error")?; },
            ErrorKind::Custom => { write!(f, "Error")?; },
        };

        write!(f, ": {}", self.desc)
    }
}

impl std::error::Error for Error {

}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Self::from_message(e.to_string())
    }
}

impl From<Box<dyn std::error::Error>> for Error {
    fn from(e: Box<dyn std::error::Error>) -> Self {
        Self::from_message(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = Error::unknown_method("NullUser", "login");
        assert_eq!(ErrorKind::UnknownMethod, e.kind());
        assert_eq!("Unknown method error: undefined method `login` for NullUser", e.to_string());

        let e = Error::argument("NullUser", Value::from(42_i64));
        assert_eq!(ErrorKind::Argument, e.kind());
        assert_eq!(Some(&Value::Int(42)), e.value());
        assert_eq!("Argument error: NullUser rejects value 42", e.to_string());
    }

    #[test]
    fn test_from_anyhow() {
        let e: Error = anyhow::anyhow!("boom").into();
        assert_eq!(ErrorKind::Custom, e.kind());
        assert_eq!("boom", e.desc());
    }
}
