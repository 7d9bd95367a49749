//! Template types for typed variable injection.

use std::marker::PhantomData;

/// Trait for template variable sets
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Replace `__NAME__` markers in one pass over `content`.
///
/// Values are inserted verbatim and never rescanned, so a value that itself
/// contains a marker comes out unchanged. Every marker must start with `__`.
pub fn substitute(content: &str, vars: &[(&str, &str)]) -> String {
    let extra: usize = vars.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(content.len() + extra);
    let mut rest = content;

    while let Some(at) = rest.find("__") {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        match vars.iter().find(|(marker, _)| rest.starts_with(marker)) {
            Some((marker, value)) => {
                out.push_str(value);
                rest = &rest[marker.len()..];
            }
            None => {
                out.push('_');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting<'a>(&'a str);

    impl TemplateVars for Greeting<'_> {
        fn apply(&self, content: &str) -> String {
            content.replace("__NAME__", self.0)
        }
    }

    #[test]
    fn test_render_injects_vars() {
        const HELLO: Template<Greeting<'static>> = Template::new("hello __NAME__!");
        assert_eq!(HELLO.render(&Greeting("postform")), "hello postform!");
    }

    #[test]
    fn test_substitute_single_pass() {
        let vars = [("__A__", "__B__"), ("__B__", "b")];
        assert_eq!(substitute("__A__ __B__", &vars), "__B__ b");
        assert_eq!(substitute("snake__case ___B__", &vars), "snake__case _b");
        assert_eq!(substitute("", &vars), "");
    }
}
