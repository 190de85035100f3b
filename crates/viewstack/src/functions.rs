//! Functions and filters shared by every template.
//!
//! A [`FunctionTable`] is assembled before any template is parsed and then
//! installed once into the root namespace. Every derived namespace inherits it,
//! so a function registered here is callable from layouts, components and
//! pages alike.
//!
//! Callables are anything MiniJinja accepts as a function: closures or `fn`
//! items whose arguments implement `ArgType` and whose return type implements
//! `FunctionResult`. Argument conversion happens at call time. Calling a
//! function with arguments that don't convert is an execution error of the
//! render that made the call, not a construction failure.
//!
//! ```rust
//! use viewstack::FunctionTable;
//!
//! let mut functions = FunctionTable::new();
//! functions.add_function("year", || 2024);
//! functions.add_filter("shout", |value: String| value.to_uppercase());
//! assert_eq!(functions.len(), 2);
//! ```

use std::collections::BTreeMap;

use minijinja::functions::Function;
use minijinja::value::{FunctionArgs, FunctionResult, Rest};
use minijinja::{Environment, State, Value};

/// Registry of named functions and filters.
///
/// Registering a name twice keeps the last registration.
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: BTreeMap<String, Value>,
    filters: BTreeMap<String, Value>,
}

impl FunctionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a function, callable as `{{ name(args) }}`.
    pub fn add_function<F, Rv, Args>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Function<Rv, Args> + Send + Sync + 'static,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.functions.insert(name.into(), Value::from_function(f));
        self
    }

    /// Registers a filter, callable as `{{ value | name(args) }}`.
    ///
    /// The piped value arrives as the first argument.
    pub fn add_filter<F, Rv, Args>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Function<Rv, Args> + Send + Sync + 'static,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.filters.insert(name.into(), Value::from_function(f));
        self
    }

    /// Merges another table into this one. Entries from `other` win.
    pub fn extend(&mut self, other: FunctionTable) {
        self.functions.extend(other.functions);
        self.filters.extend(other.filters);
    }

    /// Whether a function or filter with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.filters.contains_key(name)
    }

    /// Total number of registered functions and filters.
    pub fn len(&self) -> usize {
        self.functions.len() + self.filters.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.filters.is_empty()
    }

    /// Installs every entry into an environment.
    pub(crate) fn install(&self, env: &mut Environment<'static>) {
        for (name, function) in &self.functions {
            env.add_global(name.clone(), function.clone());
        }

        for (name, filter) in &self.filters {
            let filter = filter.clone();
            env.add_filter(name.clone(), move |state: &State, args: Rest<Value>| {
                filter.call(state, &args)
            });
        }
    }
}
