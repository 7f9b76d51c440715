use std::panic::Location;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use crate::value::Value;

/// Where and when a traced null object was constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    file: String,
    line: u32,
    column: u32,
    created_at: DateTime<Utc>,
}

impl TraceRecord {
    pub(crate) fn capture(origin: &Location<'_>) -> Self {
        Self {
            file: origin.file().to_string(),
            line: origin.line(),
            column: origin.column(),
            created_at: Utc::now(),
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

pub(crate) fn pebble(type_name: &str, method: &str, args: &[Value], caller: &Location<'_>) {
    let args = args
        .iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    info!(
        target: "null_object::pebble",
        "{}#{}({}) from {}:{}",
        type_name,
        method,
        args,
        caller.file(),
        caller.line());
}
