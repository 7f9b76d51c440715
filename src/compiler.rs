//! Resolves a builder's trait selections into an immutable [`TypeDescriptor`]
//! and dispatches messages against it.
//!
//! Name resolution order: inline overrides, then enabled conversion methods,
//! then core methods, then mimicked methods, then the fallback policy
//! (reject, or return the receiver for a black hole).

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::Display;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use log::{debug, trace};
use serde::Serialize;
use crate::builder::Builder;
use crate::catalog::{self, ConversionFn, InterfaceRef, NullReturn, TraitSelection};
use crate::error::Error;
use crate::lifecycle::Lifecycle;
use crate::null::Instance;
use crate::value::Value;
use crate::Result;

/// An inline method body.
pub type Method = Arc<dyn Fn(&Instance, &[Value]) -> Result<Value> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchMode {
    Strict,
    BlackHole,
    Mimic(InterfaceRef),
    Impersonate(InterfaceRef),
}

impl Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchMode::Strict => write!(f, "strict"),
            DispatchMode::BlackHole => write!(f, "black_hole"),
            DispatchMode::Mimic(iface) => write!(f, "mimic({})", iface.name()),
            DispatchMode::Impersonate(iface) => write!(f, "impersonate({})", iface.name()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Reject,
    ReturnSelf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoreMethod {
    Eq,
    Ne,
    Inspect,
    ToS,
    ToBool,
}

impl CoreMethod {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            catalog::EQ => Some(Self::Eq),
            catalog::NE => Some(Self::Ne),
            catalog::INSPECT => Some(Self::Inspect),
            catalog::TO_S => Some(Self::ToS),
            catalog::TO_BOOL => Some(Self::ToBool),
            _ => None,
        }
    }
}

#[derive(Clone)]
enum Handler {
    Override(Method),
    Conversion(ConversionFn),
    Core(CoreMethod),
    Mimicked,
}

/// Diagnostic view of a compiled type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSummary {
    pub name: String,
    pub lifecycle: Lifecycle,
    pub dispatch: String,
    pub allowed_methods: Option<Vec<String>>,
    pub conversions: Vec<String>,
    pub overrides: Vec<String>,
    pub traceable: bool,
    pub pebble: bool,
}

static NEXT_TYPE_ID: AtomicU64 = AtomicU64::new(1);

/// The compiled, immutable form of a builder.
pub struct TypeDescriptor {
    id: u64,
    name: String,
    lifecycle: Lifecycle,
    dispatch: DispatchMode,
    allowed: Option<BTreeSet<&'static str>>,
    conversions: Vec<&'static str>,
    overrides: Vec<String>,
    table: HashMap<String, Handler>,
    fallback: Fallback,
    exemptions: HashSet<String>,
    traceable: bool,
    pebble: bool,
    mimic_return: NullReturn,
    predicates_return: Option<bool>,
    null_equivalents: Vec<Value>,
}

pub(crate) fn compile(builder: &Builder) -> TypeDescriptor {
    let mut dispatch = DispatchMode::Strict;
    let mut lifecycle = Lifecycle::Plain;
    let mut traceable = false;
    let mut explicit = false;
    let mut implicit = false;
    let mut pebble = false;

    for selection in builder.selections.iter() {
        match selection {
            TraitSelection::Strict => dispatch = DispatchMode::Strict,
            TraitSelection::BlackHole => dispatch = DispatchMode::BlackHole,
            TraitSelection::Mimic(iface) => dispatch = DispatchMode::Mimic(*iface),
            TraitSelection::Impersonate(iface) => dispatch = DispatchMode::Impersonate(*iface),
            TraitSelection::Plain => lifecycle = Lifecycle::Plain,
            TraitSelection::Singleton => lifecycle = Lifecycle::Singleton,
            TraitSelection::Traceable => traceable = true,
            TraitSelection::ExplicitConversions => explicit = true,
            TraitSelection::ImplicitConversions => implicit = true,
            TraitSelection::Pebble => pebble = true,
        }
    }

    let allowed = match &dispatch {
        DispatchMode::Mimic(iface) | DispatchMode::Impersonate(iface) => {
            Some(iface.all_methods().into_iter().collect::<BTreeSet<_>>())
        },
        _ => None,
    };

    let mut table = HashMap::new();
    for name in allowed.iter().flatten() {
        table.insert(name.to_string(), Handler::Mimicked);
    }
    for name in catalog::CORE_METHODS {
        if let Some(core) = CoreMethod::from_name(name) {
            table.insert(name.to_string(), Handler::Core(core));
        }
    }

    let mut conversions = Vec::new();
    let enabled = [(explicit, catalog::EXPLICIT_CONVERSIONS), (implicit, catalog::IMPLICIT_CONVERSIONS)];
    for (_, set) in enabled.iter().filter(|(on, _)| *on) {
        for (name, f) in set.iter() {
            table.insert(name.to_string(), Handler::Conversion(*f));
            conversions.push(*name);
        }
    }

    let mut overrides = builder.overrides.keys().cloned().collect::<Vec<_>>();
    overrides.sort();
    for (name, body) in builder.overrides.iter() {
        table.insert(name.clone(), Handler::Override(Arc::clone(body)));
    }

    let fallback = match dispatch {
        DispatchMode::BlackHole => Fallback::ReturnSelf,
        _ => Fallback::Reject,
    };

    let exemptions = catalog::default_exemptions()
        .into_iter()
        .map(String::from)
        .chain(builder.exemptions.iter().cloned())
        .filter(|name| !builder.unexemptions.contains(name))
        .collect::<HashSet<_>>();

    let name = builder.name.clone().unwrap_or_else(|| "NullObject".to_string());
    debug!(
        "Compiled null type {}: dispatch={} lifecycle={:?} methods={} traceable={}",
        name, dispatch, lifecycle, table.len(), traceable);

    TypeDescriptor {
        id: NEXT_TYPE_ID.fetch_add(1, Ordering::Relaxed),
        name,
        lifecycle,
        dispatch,
        allowed,
        conversions,
        overrides,
        table,
        fallback,
        exemptions,
        traceable,
        pebble,
        mimic_return: builder.mimic_return.clone(),
        predicates_return: builder.predicates_return,
        null_equivalents: builder.null_equivalents.clone(),
    }
}

impl TypeDescriptor {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn dispatch_mode(&self) -> &DispatchMode {
        &self.dispatch
    }

    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    /// The closed method set of a mimic or impersonate type.
    pub fn allowed_methods(&self) -> Option<&BTreeSet<&'static str>> {
        self.allowed.as_ref()
    }

    pub fn conversions(&self) -> &[&'static str] {
        &self.conversions
    }

    pub fn traceable(&self) -> bool {
        self.traceable
    }

    pub fn pebble(&self) -> bool {
        self.pebble
    }

    pub fn is_exempt(&self, name: &str) -> bool {
        self.exemptions.contains(name)
    }

    /// Values the conversion helpers treat as absent.
    pub fn is_null_equivalent(&self, value: &Value) -> bool {
        value.is_nil() || self.null_equivalents.iter().any(|v| v == value)
    }

    pub fn responds_to(&self, name: &str) -> bool {
        self.table.contains_key(name)
            || (self.fallback == Fallback::ReturnSelf && !self.is_exempt(name))
    }

    pub(crate) fn dispatch(
        &self,
        receiver: &Instance,
        name: &str,
        args: &[Value],
        caller: &Location<'_>,
    ) -> Result<Value> {
        if self.pebble {
            crate::trace::pebble(&self.name, name, args, caller);
        }

        match self.table.get(name) {
            Some(Handler::Override(body)) => body(receiver, args),
            Some(Handler::Conversion(f)) => Ok(f()),
            Some(Handler::Core(core)) => Ok(self.call_core(*core, receiver, args)),
            Some(Handler::Mimicked) => Ok(self.mimicked(receiver, name)),
            None => match self.fallback {
                Fallback::ReturnSelf if !self.is_exempt(name) => {
                    trace!("{} swallowed `{}`", self.name, name);
                    Ok(self.swallowed(receiver, name))
                },
                _ => Err(Error::unknown_method(&self.name, name)),
            },
        }
    }

    fn call_core(&self, core: CoreMethod, receiver: &Instance, args: &[Value]) -> Value {
        let same = || {
            args.first()
                .and_then(Value::as_instance)
                .map(|other| other.same_type(receiver))
                .unwrap_or(false)
        };
        match core {
            CoreMethod::Eq => Value::Bool(same()),
            CoreMethod::Ne => Value::Bool(!same()),
            CoreMethod::Inspect => Value::Str(receiver.inspect()),
            CoreMethod::ToS => Value::Str(String::new()),
            CoreMethod::ToBool => Value::Bool(false),
        }
    }

    fn predicate(&self, name: &str) -> Option<Value> {
        match self.predicates_return {
            Some(b) if catalog::is_predicate(name) => Some(Value::Bool(b)),
            _ => None,
        }
    }

    fn mimicked(&self, receiver: &Instance, name: &str) -> Value {
        if let Some(v) = self.predicate(name) {
            return v;
        }
        match &self.mimic_return {
            NullReturn::Absent => Value::Nil,
            NullReturn::Itself => Value::Null(receiver.clone()),
            NullReturn::Value(v) => v.clone(),
        }
    }

    fn swallowed(&self, receiver: &Instance, name: &str) -> Value {
        self.predicate(name)
            .unwrap_or_else(|| Value::Null(receiver.clone()))
    }

    pub fn summary(&self) -> TypeSummary {
        TypeSummary {
            name: self.name.clone(),
            lifecycle: self.lifecycle,
            dispatch: self.dispatch.to_string(),
            allowed_methods: self.allowed
                .as_ref()
                .map(|set| set.iter().map(|m| m.to_string()).collect()),
            conversions: self.conversions.iter().map(|c| c.to_string()).collect(),
            overrides: self.overrides.clone(),
            traceable: self.traceable,
            pebble: self.pebble,
        }
    }
}
