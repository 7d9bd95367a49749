//! Embedded static resources.
//!
//! - `template` - Template types for typed variable injection
//! - `preview` - HTML page wrapping the rendered article

mod template;

pub use template::{Template, TemplateVars, substitute};

pub mod preview {
    use super::{Template, TemplateVars, substitute};
    use crate::utils::html::escape;

    /// Variables for page.html.
    pub struct PageVars<'a> {
        /// Plain-text title; escaped on injection.
        pub title: &'a str,
        /// Rendered article HTML, injected as is.
        pub body: &'a str,
        /// Markdown source; escaped on injection.
        pub source: &'a str,
    }

    impl TemplateVars for PageVars<'_> {
        fn apply(&self, content: &str) -> String {
            let title = escape(self.title);
            let source = escape(self.source);
            substitute(
                content,
                &[
                    ("__TITLE__", title.as_ref()),
                    ("__SOURCE__", source.as_ref()),
                    ("__BODY__", self.body),
                ],
            )
        }
    }

    /// Preview page template.
    pub const fn page_html<'a>() -> Template<PageVars<'a>> {
        Template::new(include_str!("preview/page.html"))
    }
}
