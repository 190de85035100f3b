//! The three discovery roots and their logical-name prefixes.

use std::fmt;

/// One of the three template namespaces a source tree is organized into.
///
/// Layers are listed leaf-first: layouts are visible to components, and
/// both are visible to every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Shared page chrome, including the base entry point.
    Layout,
    /// Reusable fragments.
    Component,
    /// Top-level views; each page is isolated from the others.
    Page,
}

impl Layer {
    /// All layers in construction order.
    pub const ALL: [Layer; 3] = [Layer::Layout, Layer::Component, Layer::Page];

    /// The root directory this layer is discovered from.
    pub fn root(self) -> &'static str {
        match self {
            Layer::Layout => "layout",
            Layer::Component => "component",
            Layer::Page => "page",
        }
    }

    /// The prefix every logical name in this layer starts with.
    pub fn prefix(self) -> &'static str {
        match self {
            Layer::Layout => "layout/",
            Layer::Component => "component/",
            Layer::Page => "page/",
        }
    }

    /// Determines the layer a logical name belongs to from its prefix.
    ///
    /// ```rust
    /// use viewstack::Layer;
    ///
    /// assert_eq!(Layer::of("component/card"), Some(Layer::Component));
    /// assert_eq!(Layer::of("page/home"), Some(Layer::Page));
    /// assert_eq!(Layer::of("home"), None);
    /// ```
    pub fn of(name: &str) -> Option<Layer> {
        Layer::ALL
            .into_iter()
            .find(|layer| name.starts_with(layer.prefix()))
    }

    /// Whether entries of this layer render directly instead of through the
    /// base entry point.
    pub fn renders_directly(self) -> bool {
        matches!(self, Layer::Layout | Layer::Component)
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_root_with_separator() {
        for layer in Layer::ALL {
            assert_eq!(layer.prefix(), format!("{}/", layer.root()));
        }
    }

    #[test]
    fn test_of_requires_separator() {
        assert_eq!(Layer::of("layout/base"), Some(Layer::Layout));
        assert_eq!(Layer::of("layouts/base"), None);
        assert_eq!(Layer::of("page"), None);
        assert_eq!(Layer::of(""), None);
    }

    #[test]
    fn test_only_pages_render_through_base() {
        assert!(Layer::Layout.renders_directly());
        assert!(Layer::Component.renders_directly());
        assert!(!Layer::Page.renders_directly());
    }
}
