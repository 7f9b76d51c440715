use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use crate::catalog::{Interface, InterfaceRef, NullReturn, TraitSelection};
use crate::compiler::{self, Method};
use crate::lifecycle::NullType;
use crate::null::Instance;
use crate::value::Value;
use crate::Result;

/// Collects trait selections and inline methods for a null type.
///
/// Selections may come in any order. When two selections touch the same
/// concern the later one wins: `black_hole().mimic::<T>()` mimics `T`, and
/// `singleton().plain()` yields a plain type. Nothing here fails; conflicts
/// are never reported as errors.
#[derive(Default, Clone)]
pub struct Builder {
    pub(crate) name: Option<String>,
    pub(crate) selections: Vec<TraitSelection>,
    pub(crate) overrides: HashMap<String, Method>,
    pub(crate) mimic_return: NullReturn,
    pub(crate) predicates_return: Option<bool>,
    pub(crate) exemptions: Vec<String>,
    pub(crate) unexemptions: Vec<String>,
    pub(crate) null_equivalents: Vec<Value>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    fn select(&mut self, selection: TraitSelection) -> &mut Self {
        self.selections.push(selection);
        self
    }

    pub fn name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn strict(&mut self) -> &mut Self {
        self.select(TraitSelection::Strict)
    }

    pub fn black_hole(&mut self) -> &mut Self {
        self.select(TraitSelection::BlackHole)
    }

    pub fn mimic<T: Interface>(&mut self) -> &mut Self {
        self.select(TraitSelection::Mimic(InterfaceRef::of::<T>()))
    }

    pub fn impersonate<T: Interface>(&mut self) -> &mut Self {
        self.select(TraitSelection::Impersonate(InterfaceRef::of::<T>()))
    }

    pub fn plain(&mut self) -> &mut Self {
        self.select(TraitSelection::Plain)
    }

    pub fn singleton(&mut self) -> &mut Self {
        self.select(TraitSelection::Singleton)
    }

    pub fn traceable(&mut self) -> &mut Self {
        self.select(TraitSelection::Traceable)
    }

    pub fn explicit_conversions(&mut self) -> &mut Self {
        self.select(TraitSelection::ExplicitConversions)
    }

    pub fn implicit_conversions(&mut self) -> &mut Self {
        self.select(TraitSelection::ImplicitConversions)
    }

    /// Logs every message instances receive.
    pub fn pebble(&mut self) -> &mut Self {
        self.select(TraitSelection::Pebble)
    }

    pub fn mimic_returns(&mut self, ret: NullReturn) -> &mut Self {
        self.mimic_return = ret;
        self
    }

    /// Mimicked and swallowed calls to names ending in `?` return `value`.
    pub fn predicates_return(&mut self, value: bool) -> &mut Self {
        self.predicates_return = Some(value);
        self
    }

    /// Keeps a black hole from swallowing `name`.
    pub fn exempt(&mut self, name: &str) -> &mut Self {
        self.unexemptions.retain(|e| e != name);
        if !self.exemptions.iter().any(|e| e == name) {
            self.exemptions.push(name.to_string());
        }
        self
    }

    /// Lets a black hole swallow `name`, including the default exemptions
    /// such as `to_ary`. Names the type defines are never swallowed.
    pub fn unexempt(&mut self, name: &str) -> &mut Self {
        self.exemptions.retain(|e| e != name);
        if !self.unexemptions.iter().any(|e| e == name) {
            self.unexemptions.push(name.to_string());
        }
        self
    }

    pub fn null_equivalent(&mut self, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        if !self.null_equivalents.contains(&value) {
            self.null_equivalents.push(value);
        }
        self
    }

    /// Defines `name` on the type, taking precedence over anything a trait provides.
    pub fn define<F>(&mut self, name: &str, body: F) -> &mut Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value> + Send + Sync + 'static
    {
        self.overrides.insert(name.to_string(), Arc::new(body));
        self
    }

    pub fn compile(&self) -> NullType {
        NullType::from_descriptor(compiler::compile(self))
    }
}

impl Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut overrides = self.overrides.keys().collect::<Vec<_>>();
        overrides.sort();
        f.debug_struct("Builder")
            .field("name", &self.name)
            .field("selections", &self.selections)
            .field("overrides", &overrides)
            .field("mimic_return", &self.mimic_return)
            .field("predicates_return", &self.predicates_return)
            .field("exemptions", &self.exemptions)
            .field("unexemptions", &self.unexemptions)
            .field("null_equivalents", &self.null_equivalents)
            .finish()
    }
}

/// Runs `configure` on a fresh [`Builder`] and compiles the result.
pub fn build<F>(configure: F) -> NullType
where
    F: FnOnce(&mut Builder)
{
    let mut builder = Builder::new();
    configure(&mut builder);
    builder.compile()
}
