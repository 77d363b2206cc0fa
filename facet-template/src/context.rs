use std::collections::HashMap;

use facet_core::Facet;
use facet_reflect::Peek;

/// A value that can be bound in a [`Context`].
///
/// Implemented for every `'static` [`Facet`] type that is `Send + Sync`:
/// structs, enums, maps, `Box`/`Arc`, `facet_value::Value` and plain scalars
/// all qualify. The resolver reads them through [`Peek`], so no extra trait
/// impls are needed.
pub trait ContextValue: Send + Sync {
    /// Returns a read-only reflection view over the value.
    fn peek(&self) -> Peek<'_, 'static>;
}

impl<T: Facet<'static> + Send + Sync> ContextValue for T {
    fn peek(&self) -> Peek<'_, 'static> {
        Peek::new(self)
    }
}

/// Named root values that template paths are resolved against.
#[derive(Default)]
pub struct Context {
    values: HashMap<String, Box<dyn ContextValue>>,
}

impl Context {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` under `name`, replacing any previous binding.
    pub fn insert<T: Facet<'static> + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.values.insert(name.into(), Box::new(value));
    }

    /// Removes the binding for `name`, returning whether one existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.values.remove(name).is_some()
    }

    /// Looks up a root binding by its exact name.
    pub fn get(&self, name: &str) -> Option<Peek<'_, 'static>> {
        self.values.get(name).map(|value| value.peek())
    }

    /// Returns true if `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of root bindings.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.values.iter().map(|(name, value)| (name, value.peek())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_overwrites_previous_binding() {
        let mut context = Context::new();
        context.insert("name", 1u32);
        context.insert("name", String::from("second"));

        assert_eq!(context.len(), 1);
        let peek = context.get("name").unwrap();
        assert_eq!(peek.as_str(), Some("second"));
    }

    #[test]
    fn lookup_is_exact() {
        let mut context = Context::new();
        context.insert("Name", 1u32);

        assert!(context.contains("Name"));
        assert!(!context.contains("name"));
        assert!(context.get("name").is_none());
        assert!(context.remove("Name"));
        assert!(context.is_empty());
    }
}
