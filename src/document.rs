//! Component markup and the document fragment handed to the layout engine.

/// Markup plus associated stylesheet text produced by a component render.
#[derive(Debug, Clone, Default)]
pub struct Markup {
    /// The component's rendered markup.
    pub html: String,
    /// Stylesheet text scoped to that markup.
    pub css: String,
}

/// A component that renders to markup.
///
/// Rendering is synchronous and side-effect free; the pipeline invokes it
/// exactly once per render, before layout begins.
pub trait OgComponent {
    /// Input properties the component renders from.
    type Props;

    /// Render the component for the given properties.
    fn render(&self, props: &Self::Props) -> Markup;
}

/// The single document fragment the layout engine parses and lays out.
///
/// Markup and stylesheet are concatenated into one fragment with an embedded
/// `<style>` block; parsing it into the engine's own tree representation is
/// the engine's business.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    markup: String,
}

impl DocumentTree {
    /// Build the fragment from a component's rendered markup.
    pub fn from_markup(markup: &Markup) -> Self {
        let markup = if markup.css.is_empty() {
            markup.html.clone()
        } else {
            format!("{}<style>{}</style>", markup.html, markup.css)
        };
        Self { markup }
    }

    /// The combined fragment text.
    pub fn markup(&self) -> &str {
        &self.markup
    }
}
