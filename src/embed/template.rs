//! Embedded HTML with `__NAME__` placeholders, filled from a typed set of
//! variables so each fragment can only be rendered with its own values.

use std::marker::PhantomData;

/// Values for one embedded fragment.
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    source: &'static str,
    vars: PhantomData<V>,
}

impl<V: TemplateVars> Template<V> {
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            vars: PhantomData,
        }
    }

    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.source)
    }
}
