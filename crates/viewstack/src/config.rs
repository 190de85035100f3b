//! Engine configuration: the [`ViewsBuilder`] and file-based [`ViewsConfig`].
//!
//! Everything is decided before the first template is parsed. The builder
//! collects a template source, the function table and engine options, and
//! [`build`](ViewsBuilder::build) turns them into an immutable [`Views`].
//!
//! ```rust
//! use viewstack::{CollisionPolicy, Views};
//!
//! let views = Views::builder()
//!     .embedded(&[
//!         ("layout/base.html", "<body>{% include page_template %}</body>"),
//!         ("page/home.html", "{{ title() }}"),
//!     ])
//!     .function("title", || "Home")
//!     .collisions(CollisionPolicy::Error)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(views.render_to_string("page/home", &()).unwrap(), "<body>Home</body>");
//! ```
//!
//! # Configuration Files
//!
//! Options can also come from YAML:
//!
//! ```yaml
//! template-dir: ./views
//! base-entry: layout/base
//! collisions: error        # or last-wins
//! escape: html             # or none
//! undefined: strict        # or lenient, chainable
//! ```
//!
//! Every key is optional; missing keys keep their defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use minijinja::functions::Function;
use minijinja::value::{FunctionArgs, FunctionResult};
use minijinja::{AutoEscape, UndefinedBehavior};
use serde::Deserialize;

use crate::compose::compose;
use crate::error::ViewError;
use crate::functions::FunctionTable;
use crate::source::{DirSource, MemorySource, TemplateSource};
use crate::views::Views;

/// Default name of the entry point pages render through.
pub const DEFAULT_BASE_ENTRY: &str = "layout/base";

/// What to do when two sources in one namespace share a logical name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// The source listed later replaces the earlier one. A warning is logged.
    #[default]
    LastWins,
    /// Building fails with [`ViewError::Collision`].
    Error,
}

/// Output escaping applied to every template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Escape {
    /// HTML-escape interpolated values.
    #[default]
    Html,
    /// Emit values verbatim.
    None,
}

impl Escape {
    fn auto_escape(self) -> AutoEscape {
        match self {
            Escape::Html => AutoEscape::Html,
            Escape::None => AutoEscape::None,
        }
    }
}

/// How templates treat undefined values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Undefined {
    /// Undefined values render as empty and are falsy.
    #[default]
    Lenient,
    /// Like `Lenient`, and attribute access on undefined stays undefined.
    Chainable,
    /// Any use of an undefined value is an execution error.
    Strict,
}

impl Undefined {
    fn behavior(self) -> UndefinedBehavior {
        match self {
            Undefined::Lenient => UndefinedBehavior::Lenient,
            Undefined::Chainable => UndefinedBehavior::Chainable,
            Undefined::Strict => UndefinedBehavior::Strict,
        }
    }
}

/// Resolved engine options, fixed once building starts.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub base_entry: String,
    pub collisions: CollisionPolicy,
    pub escape: Escape,
    pub undefined: Undefined,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_entry: DEFAULT_BASE_ENTRY.to_string(),
            collisions: CollisionPolicy::default(),
            escape: Escape::default(),
            undefined: Undefined::default(),
        }
    }
}

impl Settings {
    /// Applies engine-level options to a fresh environment.
    pub fn configure(&self, env: &mut minijinja::Environment<'static>) {
        let escape = self.escape;
        env.set_auto_escape_callback(move |_name: &str| escape.auto_escape());
        env.set_undefined_behavior(self.undefined.behavior());
    }
}

/// Engine options loaded from a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ViewsConfig {
    /// Directory holding `layout/`, `component/` and `page/`.
    pub template_dir: Option<PathBuf>,
    /// Entry point pages render through.
    pub base_entry: Option<String>,
    /// Collision handling.
    pub collisions: Option<CollisionPolicy>,
    /// Output escaping.
    pub escape: Option<Escape>,
    /// Undefined value handling.
    pub undefined: Option<Undefined>,
}

impl ViewsConfig {
    /// Parses configuration from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Configuration`] if the YAML is malformed or has
    /// unknown keys.
    pub fn from_yaml(yaml: &str) -> Result<Self, ViewError> {
        serde_yaml::from_str(yaml)
            .map_err(|e| ViewError::Configuration(format!("invalid views config: {}", e)))
    }

    /// Loads configuration from a YAML file.
    ///
    /// A relative `template-dir` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Configuration`] if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ViewError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ViewError::Configuration(format!("failed to read {}: {}", path.display(), e))
        })?;

        let mut config = Self::from_yaml(&content)?;
        if let (Some(dir), Some(parent)) = (&config.template_dir, path.parent()) {
            if dir.is_relative() {
                config.template_dir = Some(parent.join(dir));
            }
        }
        Ok(config)
    }
}

/// Builder for [`Views`].
///
/// A template source is required; everything else has a default. See the
/// [module docs](self) for an example.
pub struct ViewsBuilder {
    source: Option<Box<dyn TemplateSource>>,
    functions: FunctionTable,
    settings: Settings,
}

impl Default for ViewsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ViewsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewsBuilder")
            .field("source", &self.source.is_some())
            .field("functions", &self.functions)
            .field("settings", &self.settings)
            .finish()
    }
}

impl ViewsBuilder {
    /// Creates a builder with no source and default options.
    pub fn new() -> Self {
        Self {
            source: None,
            functions: FunctionTable::new(),
            settings: Settings::default(),
        }
    }

    /// Sets the template source. Replaces any source set earlier.
    pub fn source(mut self, source: impl TemplateSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Reads templates from a directory on disk.
    pub fn template_dir(self, path: impl Into<PathBuf>) -> Self {
        self.source(DirSource::new(path))
    }

    /// Reads templates from `(path, content)` pairs held in memory.
    pub fn embedded(self, entries: &[(&str, &str)]) -> Self {
        self.source(MemorySource::from_entries(entries))
    }

    /// Registers a template function. The last registration for a name wins.
    pub fn function<F, Rv, Args>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Function<Rv, Args> + Send + Sync + 'static,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.functions.add_function(name, f);
        self
    }

    /// Registers a template filter. The last registration for a name wins.
    pub fn filter<F, Rv, Args>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Function<Rv, Args> + Send + Sync + 'static,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.functions.add_filter(name, f);
        self
    }

    /// Merges a prepared function table. Its entries override earlier ones.
    pub fn functions(mut self, table: FunctionTable) -> Self {
        self.functions.extend(table);
        self
    }

    /// Sets the entry point pages are rendered through.
    pub fn base_entry(mut self, name: impl Into<String>) -> Self {
        self.settings.base_entry = name.into();
        self
    }

    /// Sets how logical-name collisions are handled.
    pub fn collisions(mut self, policy: CollisionPolicy) -> Self {
        self.settings.collisions = policy;
        self
    }

    /// Sets output escaping.
    pub fn auto_escape(mut self, escape: Escape) -> Self {
        self.settings.escape = escape;
        self
    }

    /// Sets undefined value handling.
    pub fn undefined(mut self, undefined: Undefined) -> Self {
        self.settings.undefined = undefined;
        self
    }

    /// Applies options from a [`ViewsConfig`]. Keys absent from the config
    /// leave the builder unchanged.
    pub fn config(mut self, config: ViewsConfig) -> Self {
        if let Some(dir) = config.template_dir {
            self = self.template_dir(dir);
        }
        if let Some(base_entry) = config.base_entry {
            self.settings.base_entry = base_entry;
        }
        if let Some(collisions) = config.collisions {
            self.settings.collisions = collisions;
        }
        if let Some(escape) = config.escape {
            self.settings.escape = escape;
        }
        if let Some(undefined) = config.undefined {
            self.settings.undefined = undefined;
        }
        self
    }

    /// Discovers, parses and composes every template.
    ///
    /// # Errors
    ///
    /// - [`ViewError::Configuration`] if no source was set or the base entry
    ///   name is empty
    /// - [`ViewError::SourceRead`] if a source cannot be walked or read
    /// - [`ViewError::Parse`] if a template has a syntax error
    /// - [`ViewError::Collision`] under [`CollisionPolicy::Error`]
    pub fn build(self) -> Result<Views, ViewError> {
        let source = self.source.ok_or_else(|| {
            ViewError::Configuration("no template source configured".to_string())
        })?;

        if self.settings.base_entry.is_empty() {
            return Err(ViewError::Configuration(
                "base entry name must not be empty".to_string(),
            ));
        }

        let layers = compose(source.as_ref(), &self.functions, &self.settings)?;
        Ok(Views::new(layers, self.settings.base_entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_without_source_is_configuration_error() {
        let err = ViewsBuilder::new().build().unwrap_err();
        assert!(matches!(err, ViewError::Configuration(_)));
    }

    #[test]
    fn test_build_rejects_empty_base_entry() {
        let err = ViewsBuilder::new()
            .embedded(&[])
            .base_entry("")
            .build()
            .unwrap_err();
        assert!(matches!(err, ViewError::Configuration(_)));
    }

    #[test]
    fn test_config_from_yaml() {
        let config = ViewsConfig::from_yaml(
            r#"
template-dir: ./views
base-entry: layout/shell
collisions: error
escape: none
undefined: strict
"#,
        )
        .unwrap();

        assert_eq!(config.template_dir, Some(PathBuf::from("./views")));
        assert_eq!(config.base_entry.as_deref(), Some("layout/shell"));
        assert_eq!(config.collisions, Some(CollisionPolicy::Error));
        assert_eq!(config.escape, Some(Escape::None));
        assert_eq!(config.undefined, Some(Undefined::Strict));
    }

    #[test]
    fn test_config_defaults_when_empty() {
        let config = ViewsConfig::from_yaml("{}").unwrap();
        assert_eq!(config, ViewsConfig::default());
    }

    #[test]
    fn test_config_rejects_unknown_keys() {
        let err = ViewsConfig::from_yaml("hot-reload: true").unwrap_err();
        assert!(matches!(err, ViewError::Configuration(_)));
    }

    #[test]
    fn test_config_from_file_resolves_relative_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("views.yaml");
        std::fs::write(&path, "template-dir: templates\n").unwrap();

        let config = ViewsConfig::from_file(&path).unwrap();
        assert_eq!(config.template_dir, Some(dir.path().join("templates")));
    }

    #[test]
    fn test_config_applies_to_builder() {
        let config = ViewsConfig {
            base_entry: Some("layout/shell".to_string()),
            escape: Some(Escape::None),
            ..ViewsConfig::default()
        };

        let views = ViewsBuilder::new()
            .embedded(&[
                ("layout/shell.html", "[{% include page_template %}]"),
                ("page/home.html", "{{ markup }}"),
            ])
            .config(config)
            .build()
            .unwrap();

        assert_eq!(views.base_entry(), "layout/shell");
        let out = views
            .render_to_string("page/home", &serde_json::json!({ "markup": "<b>" }))
            .unwrap();
        assert_eq!(out, "[<b>]");
    }
}
