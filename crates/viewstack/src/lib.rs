//! # viewstack - Layered Templates for Server-Rendered Views
//!
//! `viewstack` composes template files organized into three layers into a
//! ready-to-render engine:
//!
//! - `layout/`: shared page chrome, including the base entry point
//! - `component/`: reusable fragments
//! - `page/`: top-level views
//!
//! Every component sees every layout; every page sees every component and
//! layout; pages never see each other. Templates use MiniJinja syntax.
//!
//! ## Quick Start
//!
//! ```rust
//! use viewstack::Views;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Home {
//!     user: String,
//! }
//!
//! let views = Views::builder()
//!     .embedded(&[
//!         ("layout/base.html", "<html>{% include page_template %}</html>"),
//!         ("component/greeting.html", "Hello, {{ user }}!"),
//!         ("page/home.html", "<h1>{% include 'component/greeting' %}</h1>"),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! let html = views
//!     .render_to_string("page/home", &Home { user: "Ada".into() })
//!     .unwrap();
//! assert_eq!(html, "<html><h1>Hello, Ada!</h1></html>");
//! ```
//!
//! ## Logical Names
//!
//! Templates are addressed by their path up to the first `.`, prefix
//! included: `page/home.html` is `page/home`, `component/nav/menu.html` is
//! `component/nav/menu`. See [`resolve_name`].
//!
//! ## Rendering
//!
//! [`Views::render`] writes to any [`std::io::Write`]. Layouts and components
//! render as themselves. Pages render through the base entry
//! ([`DEFAULT_BASE_ENTRY`] unless configured), which includes the page via
//! the [`PAGE_TEMPLATE_GLOBAL`] global bound in each page's namespace.
//!
//! ## Key Types
//!
//! - [`Views`]: the built engine
//! - [`ViewsBuilder`] / [`ViewsConfig`]: configuration
//! - [`TemplateSource`]: where templates come from ([`MemorySource`], [`DirSource`])
//! - [`FunctionTable`]: functions and filters available to every template
//! - [`ViewError`]: construction and render errors

mod compose;
mod config;
mod error;
mod functions;
mod layer;
mod namespace;
pub mod source;
mod views;

pub use compose::PAGE_TEMPLATE_GLOBAL;
pub use config::{
    CollisionPolicy, Escape, Undefined, ViewsBuilder, ViewsConfig, DEFAULT_BASE_ENTRY,
};
pub use error::ViewError;
pub use functions::FunctionTable;
pub use layer::Layer;
pub use source::{
    list_assets, resolve_name, AssetEntry, DirSource, MemorySource, TemplateSource,
};
pub use views::Views;

// Template engine types (values, errors) for callers writing functions.
pub use minijinja;
