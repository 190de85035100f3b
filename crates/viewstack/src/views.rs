//! The renderable engine.
//!
//! [`Views`] holds the composed namespaces and exposes rendering. It is built
//! once by [`ViewsBuilder`](crate::ViewsBuilder) and never changes afterwards,
//! so a single instance can be shared by reference (or behind an `Arc`) between
//! any number of threads rendering concurrently.
//!
//! # Dispatch
//!
//! | Name | Namespace searched | Executed entry |
//! |------|--------------------|----------------|
//! | `layout/...` | shared | the named template |
//! | `component/...` | shared | the named template |
//! | `page/...` | first page namespace defining it | the base entry |
//!
//! Page renders go through the base entry (default `layout/base`), which
//! pulls the page in via the `page_template` global:
//!
//! ```jinja
//! <html><body>{% include page_template %}</body></html>
//! ```

use std::io;

use serde::Serialize;

use crate::compose::Layers;
use crate::error::ViewError;
use crate::layer::Layer;
use crate::namespace::Namespace;

/// Composed layout, component and page templates, ready to render.
#[derive(Debug, Clone)]
pub struct Views {
    layers: Layers,
    base_entry: String,
}

impl Views {
    pub(crate) fn new(layers: Layers, base_entry: String) -> Self {
        Self { layers, base_entry }
    }

    /// Starts configuring a new engine.
    pub fn builder() -> crate::ViewsBuilder {
        crate::ViewsBuilder::new()
    }

    /// Renders the template `name` with `data` into `sink`.
    ///
    /// Layouts and components execute directly. Pages execute the base entry
    /// of their own namespace.
    ///
    /// # Errors
    ///
    /// - [`ViewError::NotFound`] if no namespace defines `name`; nothing is
    ///   written to `sink`
    /// - [`ViewError::Execution`] if the template engine fails; output written
    ///   before the failure stays in `sink`
    pub fn render<W, S>(&self, sink: W, name: &str, data: &S) -> Result<(), ViewError>
    where
        W: io::Write,
        S: Serialize + ?Sized,
    {
        let namespace = self
            .lookup(name)
            .ok_or_else(|| ViewError::not_found(name))?;

        let entry = match Layer::of(name) {
            Some(layer) if layer.renders_directly() => name,
            _ => self.base_entry.as_str(),
        };
        tracing::trace!(name, entry, "rendering");

        namespace
            .execute(entry, data, sink)
            .map_err(|source| ViewError::Execution {
                name: name.to_string(),
                source,
            })
    }

    /// Renders the template `name` with `data` into a `String`.
    ///
    /// See [`render`](Self::render) for dispatch and errors.
    pub fn render_to_string<S>(&self, name: &str, data: &S) -> Result<String, ViewError>
    where
        S: Serialize + ?Sized,
    {
        let mut out = Vec::new();
        self.render(&mut out, name, data)?;
        String::from_utf8(out).map_err(|e| ViewError::Execution {
            name: name.to_string(),
            source: minijinja::Error::new(minijinja::ErrorKind::BadSerialization, e.to_string()),
        })
    }

    /// Whether [`render`](Self::render) would find `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Logical names of all pages, in construction order.
    ///
    /// A name appears more than once if several sources resolved to it; only
    /// the first is ever rendered.
    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.layers.pages.iter().map(|page| page.name.as_str())
    }

    /// Logical names of all layouts and components, sorted.
    pub fn shared_names(&self) -> impl Iterator<Item = &str> {
        self.layers.shared.names()
    }

    /// The entry point page renders execute.
    pub fn base_entry(&self) -> &str {
        &self.base_entry
    }

    fn lookup(&self, name: &str) -> Option<&Namespace> {
        if name.starts_with(Layer::Page.prefix()) {
            return self
                .layers
                .pages
                .iter()
                .find(|page| page.namespace.contains(name))
                .map(|page| &page.namespace);
        }

        Some(&self.layers.shared).filter(|shared| shared.contains(name))
    }
}
