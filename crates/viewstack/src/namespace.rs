//! Namespaces of parsed templates and the loader that fills them.
//!
//! A [`Namespace`] is one MiniJinja environment plus a record of which source
//! file each logical name came from. Namespaces inherit by cloning: the child
//! starts as an independent copy of its parent and then gains its own entries.
//! Compiled templates are shared behind reference counts inside the
//! environment, so a clone costs a map copy, not a re-parse, and adding to the
//! child never changes the parent or any sibling.

use std::collections::BTreeMap;
use std::io;

use minijinja::{Environment, Value};
use serde::Serialize;

use crate::config::{CollisionPolicy, Settings};
use crate::error::ViewError;
use crate::functions::FunctionTable;
use crate::source::{read_text, resolve_name, TemplateSource};

/// A composed set of named, parsed templates.
#[derive(Debug, Clone)]
pub(crate) struct Namespace {
    env: Environment<'static>,
    /// Logical name -> source path it was parsed from.
    entries: BTreeMap<String, String>,
}

impl Namespace {
    /// Creates an empty namespace with the function table installed.
    pub fn root(functions: &FunctionTable, settings: &Settings) -> Self {
        let mut env = Environment::new();
        settings.configure(&mut env);
        functions.install(&mut env);
        Self {
            env,
            entries: BTreeMap::new(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Logical names visible in this namespace, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Binds a namespace-local global.
    pub fn bind_global(&mut self, name: &'static str, value: impl Into<Value>) {
        self.env.add_global(name, value.into());
    }

    /// Parses `source` under `name`.
    fn define(
        &mut self,
        name: &str,
        path: &str,
        source: String,
        policy: CollisionPolicy,
    ) -> Result<(), ViewError> {
        if let Some(existing) = self.entries.get(name) {
            match policy {
                CollisionPolicy::Error => {
                    return Err(ViewError::Collision {
                        name: name.to_string(),
                        existing: existing.clone(),
                        conflicting: path.to_string(),
                    });
                }
                CollisionPolicy::LastWins => {
                    tracing::warn!(
                        name,
                        existing = %existing,
                        replacement = path,
                        "template name collision, later source wins"
                    );
                }
            }
        }

        self.env
            .add_template_owned(name.to_string(), source)
            .map_err(|source| ViewError::Parse {
                name: name.to_string(),
                source,
            })?;
        self.entries.insert(name.to_string(), path.to_string());
        Ok(())
    }

    /// Executes `entry` with `data`, streaming output into `sink`.
    ///
    /// Output written before a failure stays written.
    pub fn execute<S, W>(&self, entry: &str, data: &S, sink: W) -> Result<(), minijinja::Error>
    where
        S: Serialize + ?Sized,
        W: io::Write,
    {
        let template = self.env.get_template(entry)?;
        template.render_to_write(data, sink)?;
        Ok(())
    }
}

/// Parses lists of source files into namespaces.
pub(crate) struct LayerLoader<'a> {
    source: &'a dyn TemplateSource,
    functions: &'a FunctionTable,
    settings: &'a Settings,
}

impl<'a> LayerLoader<'a> {
    pub fn new(
        source: &'a dyn TemplateSource,
        functions: &'a FunctionTable,
        settings: &'a Settings,
    ) -> Self {
        Self {
            source,
            functions,
            settings,
        }
    }

    /// Loads `paths` into a clone of `parent`, or into a fresh namespace.
    ///
    /// Paths are parsed in the order given; a later path replaces an earlier
    /// one with the same logical name unless collisions are configured as
    /// errors. Stops at the first read or parse failure.
    pub fn load(&self, paths: &[String], parent: Option<&Namespace>) -> Result<Namespace, ViewError> {
        let mut namespace = match parent {
            Some(parent) => parent.clone(),
            None => Namespace::root(self.functions, self.settings),
        };

        for path in paths {
            let text = read_text(self.source, path)?;
            let name = resolve_name(path);
            tracing::trace!(name, path = %path, "parsing template");
            namespace.define(name, path, text, self.settings.collisions)?;
        }

        Ok(namespace)
    }
}
