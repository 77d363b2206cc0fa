use std::collections::HashMap;

use crate::trace;

/// A named text transform, applied to a resolved value.
pub type TransformFn = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Registry of chainable text transforms, looked up case-insensitively.
///
/// The default registry knows `upper`, `lower` and `trim`. Applying a name
/// that isn't registered returns the input unchanged.
pub struct Transforms {
    by_name: HashMap<String, TransformFn>,
}

impl Transforms {
    /// A registry without any transforms: every name is the identity.
    pub fn empty() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    /// Registers `transform` under `name`, replacing any transform already
    /// registered under the same (case-insensitive) name.
    pub fn register(
        &mut self,
        name: &str,
        transform: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> &mut Self {
        self.by_name.insert(name.to_lowercase(), Box::new(transform));
        self
    }

    /// Returns true if a transform is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(&name.to_lowercase())
    }

    /// Registered names (lowercased), sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Applies the transform registered under `name` to `input`.
    pub fn apply(&self, name: &str, input: String) -> String {
        match self.by_name.get(&name.to_lowercase()) {
            Some(transform) => transform(&input),
            None => {
                trace!("unknown transform {name:?}, passing value through");
                input
            }
        }
    }
}

impl Default for Transforms {
    fn default() -> Self {
        let mut transforms = Self::empty();
        transforms
            .register("upper", str::to_uppercase)
            .register("lower", str::to_lowercase)
            .register("trim", |s| s.trim().to_owned());
        transforms
    }
}

impl core::fmt::Debug for Transforms {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins() {
        let transforms = Transforms::default();
        assert_eq!(transforms.apply("upper", "Bob".into()), "BOB");
        assert_eq!(transforms.apply("lower", "Bob".into()), "bob");
        assert_eq!(transforms.apply("trim", "  Bob \n".into()), "Bob");
        assert_eq!(transforms.names(), ["lower", "trim", "upper"]);
    }

    #[test]
    fn names_are_case_insensitive() {
        let transforms = Transforms::default();
        assert_eq!(transforms.apply("UPPER", "bob".into()), "BOB");
        assert_eq!(transforms.apply("Trim", " x ".into()), "x");
        assert!(transforms.contains("LoWeR"));
    }

    #[test]
    fn unknown_name_is_identity() {
        let transforms = Transforms::default();
        assert_eq!(transforms.apply("bogus", "x".into()), "x");
        assert_eq!(transforms.apply(" upper", "x".into()), "x");
        assert_eq!(Transforms::empty().apply("upper", "x".into()), "x");
    }

    #[test]
    fn register_replaces_existing() {
        let mut transforms = Transforms::default();
        transforms.register("Upper", |s| format!("<{s}>"));
        transforms.register("reverse", |s| s.chars().rev().collect());

        assert_eq!(transforms.apply("upper", "a".into()), "<a>");
        assert_eq!(transforms.apply("REVERSE", "abc".into()), "cba");
        assert_eq!(transforms.names(), ["lower", "reverse", "trim", "upper"]);
    }
}
