//! Builds the layered namespaces from a template source.
//!
//! Construction runs in three stages, each inheriting from the previous:
//!
//! ```text
//! layout ──clone──▶ component ──clone──▶ page/home
//!                              ├─clone──▶ page/about
//!                              └─clone──▶ page/...
//! ```
//!
//! Components see layouts; pages see components and layouts; no page sees
//! another page. Shared layers are parsed once: each page namespace is a clone
//! of the already-parsed component namespace.

use std::collections::HashMap;

use crate::config::{CollisionPolicy, Settings};
use crate::error::ViewError;
use crate::functions::FunctionTable;
use crate::layer::Layer;
use crate::namespace::{LayerLoader, Namespace};
use crate::source::{list_assets, resolve_name, TemplateSource};

/// Name of the namespace-local global holding a page's own logical name.
///
/// The base entry uses it to pull the page in, e.g.
/// `{% include page_template %}`.
pub const PAGE_TEMPLATE_GLOBAL: &str = "page_template";

/// A page's own namespace.
#[derive(Debug, Clone)]
pub(crate) struct PageNamespace {
    pub name: String,
    pub namespace: Namespace,
}

/// The composed namespaces.
#[derive(Debug, Clone)]
pub(crate) struct Layers {
    /// Layouts and components.
    pub shared: Namespace,
    /// One namespace per page source, in listing order.
    pub pages: Vec<PageNamespace>,
}

/// Discovers, parses and composes every layer of `source`.
pub(crate) fn compose(
    source: &dyn TemplateSource,
    functions: &FunctionTable,
    settings: &Settings,
) -> Result<Layers, ViewError> {
    let loader = LayerLoader::new(source, functions, settings);

    let layout_paths = list_assets(source, Layer::Layout)?;
    let layouts = loader.load(&layout_paths, None)?;
    tracing::debug!(layer = %Layer::Layout, templates = layout_paths.len(), "loaded layer");

    let component_paths = list_assets(source, Layer::Component)?;
    let shared = loader.load(&component_paths, Some(&layouts))?;
    tracing::debug!(
        layer = %Layer::Component,
        templates = component_paths.len(),
        visible = shared.len(),
        "loaded layer"
    );

    let page_paths = list_assets(source, Layer::Page)?;
    let mut pages = Vec::with_capacity(page_paths.len());
    let mut first_source: HashMap<&str, &str> = HashMap::new();

    for path in &page_paths {
        let name = resolve_name(path);
        if let Some(existing) = first_source.get(name) {
            match settings.collisions {
                CollisionPolicy::Error => {
                    return Err(ViewError::Collision {
                        name: name.to_string(),
                        existing: existing.to_string(),
                        conflicting: path.clone(),
                    });
                }
                CollisionPolicy::LastWins => {
                    tracing::warn!(
                        name,
                        served = %existing,
                        shadowed = %path,
                        "page name collision, first listed page is served"
                    );
                }
            }
        } else {
            first_source.insert(name, path);
        }

        let mut namespace = loader.load(std::slice::from_ref(path), Some(&shared))?;
        namespace.bind_global(PAGE_TEMPLATE_GLOBAL, name);
        pages.push(PageNamespace {
            name: name.to_string(),
            namespace,
        });
    }
    tracing::debug!(layer = %Layer::Page, templates = pages.len(), "loaded layer");

    if !pages.is_empty() && !shared.contains(&settings.base_entry) {
        tracing::warn!(
            base_entry = %settings.base_entry,
            "base entry not found; page renders will fail"
        );
    }

    Ok(Layers { shared, pages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn compose_entries(entries: &[(&str, &str)], settings: &Settings) -> Result<Layers, ViewError> {
        let source = MemorySource::from_entries(entries);
        compose(&source, &FunctionTable::new(), settings)
    }

    #[test]
    fn test_one_namespace_per_page() {
        let layers = compose_entries(
            &[
                ("layout/base.html", "{% include page_template %}"),
                ("component/card.html", "card"),
                ("page/a.html", "a"),
                ("page/b.html", "b"),
            ],
            &Settings::default(),
        )
        .unwrap();

        assert_eq!(layers.pages.len(), 2);
        assert_eq!(layers.pages[0].name, "page/a");
        assert_eq!(layers.pages[1].name, "page/b");

        let a = &layers.pages[0].namespace;
        assert!(a.contains("page/a"));
        assert!(a.contains("component/card"));
        assert!(a.contains("layout/base"));
        assert!(!a.contains("page/b"));

        assert!(!layers.shared.contains("page/a"));
    }

    #[test]
    fn test_all_layers_optional() {
        let layers = compose_entries(&[], &Settings::default()).unwrap();
        assert_eq!(layers.shared.len(), 0);
        assert!(layers.pages.is_empty());
    }

    #[test]
    fn test_page_sees_its_own_name_global() {
        let layers = compose_entries(
            &[("page/home.html", "{{ page_template|safe }}")],
            &Settings::default(),
        )
        .unwrap();

        let mut out = Vec::new();
        layers.pages[0]
            .namespace
            .execute("page/home", &(), &mut out)
            .unwrap();
        assert_eq!(out, b"page/home");
    }

    #[test]
    fn test_duplicate_page_names_error_under_strict_policy() {
        let settings = Settings {
            collisions: CollisionPolicy::Error,
            ..Settings::default()
        };
        let err = compose_entries(
            &[("page/a.html", "html"), ("page/a.txt", "txt")],
            &settings,
        )
        .unwrap_err();
        assert!(matches!(err, ViewError::Collision { ref name, .. } if name == "page/a"));
    }

    #[test]
    fn test_parse_error_aborts_composition() {
        let err = compose_entries(
            &[
                ("component/ok.html", "fine"),
                ("page/bad.html", "{% if %}"),
            ],
            &Settings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ViewError::Parse { ref name, .. } if name == "page/bad"));
    }
}
