use std::path::Path;

use facet_core::Facet;
use facet_reflect::Peek;
use indexmap::IndexMap;

use crate::section::{self, Extracted};
use crate::{Context, TemplateError, Transforms, debug, interpolate, trace};

/// A template being filled in.
///
/// The document owns its source text and everything bound to it. Variables
/// are bound with [`var`](Self::var), sections are rendered (possibly many
/// times) with [`section`](Self::section), and [`render`](Self::render)
/// produces the final text.
///
/// A `Document` is `Send + Sync`: it can be moved to another thread, or
/// shared behind a `Mutex` when several threads fill in the same template.
#[derive(Debug)]
pub struct Document {
    source: String,
    context: Context,
    transforms: Transforms,
    /// Section bodies, captured the first time each section is rendered.
    blocks: IndexMap<String, String>,
    /// Concatenated renders of each section, in call order.
    accumulated: IndexMap<String, String>,
}

impl Document {
    /// Creates a document from in-memory template text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            context: Context::new(),
            transforms: Transforms::default(),
            blocks: IndexMap::new(),
            accumulated: IndexMap::new(),
        }
    }

    /// Reads a template file.
    ///
    /// The bytes are taken as UTF-8; invalid sequences become U+FFFD.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let source = read_text(path)?;
        debug!("loaded template {} ({} bytes)", path.display(), source.len());
        Ok(Self::new(source))
    }

    /// Replaces the transform registry.
    pub fn with_transforms(mut self, transforms: Transforms) -> Self {
        self.transforms = transforms;
        self
    }

    /// The transform registry, for registering extra transforms.
    pub fn transforms_mut(&mut self) -> &mut Transforms {
        &mut self.transforms
    }

    /// The current source text, with includes spliced in and extracted
    /// sections replaced by their placeholder tokens.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The variables bound so far.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Reads a file and splices its raw content in place of every literal
    /// `{{var_name}}` in the source.
    pub fn include_file(
        &mut self,
        var_name: &str,
        path: impl AsRef<Path>,
    ) -> Result<(), TemplateError> {
        let path = path.as_ref();
        let content = read_text(path)?;
        debug!("including {} as {var_name:?}", path.display());
        self.include_str(var_name, &content);
        Ok(())
    }

    /// Replaces every literal `{{var_name}}` in the source with `content`.
    ///
    /// This is plain text substitution: `{{var_name|upper}}` is left alone,
    /// and markers inside `content` are only evaluated at render time.
    pub fn include_str(&mut self, var_name: &str, content: &str) {
        self.source = self.source.replace(&section::marker(var_name), content);
    }

    /// Binds `value` to `name`, replacing any previous value.
    pub fn var<T: Facet<'static> + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.context.insert(name, value);
    }

    /// The value bound to `name`, if any.
    pub fn var_value(&self, name: &str) -> Option<Peek<'_, 'static>> {
        self.context.get(name)
    }

    /// Returns true if the bare marker `{{name}}` appears in the source.
    ///
    /// This is a textual check: the variable does not need to be bound, and
    /// a marker with transforms (`{{name|upper}}`) does not count.
    pub fn var_exists(&self, name: &str) -> bool {
        self.source.contains(&section::marker(name))
    }

    /// Renders section `name` against the current variables and appends the
    /// result to the section's output.
    ///
    /// The first call extracts the `[[name]]...[[/name]]` block from the
    /// source and leaves a placeholder in its place. If the block can't be
    /// found, the call does nothing.
    pub fn section(&mut self, name: &str) {
        if !self.blocks.contains_key(name) {
            let Some(Extracted { body, source }) = section::extract(&self.source, name) else {
                trace!("section {name:?} not found, skipping");
                return;
            };
            trace!("extracted section {name:?} ({} bytes)", body.len());
            self.source = source;
            self.blocks.insert(name.to_owned(), body);
        }
        let Some(body) = self.blocks.get(name) else {
            return;
        };

        let rendered = interpolate(body, &self.context, &self.transforms);
        self.accumulated
            .entry(name.to_owned())
            .or_default()
            .push_str(&rendered);
    }

    /// Names of the sections extracted so far, in extraction order.
    pub fn sections(&self) -> impl Iterator<Item = &str> + '_ {
        self.blocks.keys().map(String::as_str)
    }

    /// Forgets every section's accumulated output. Extracted bodies and
    /// placeholders stay, so sections can be filled again from scratch.
    pub fn reset_sections(&mut self) {
        for output in self.accumulated.values_mut() {
            output.clear();
        }
    }

    /// Produces the final text: substitutes each section's output for its
    /// placeholder, then evaluates every remaining marker.
    ///
    /// Does not modify the document.
    pub fn render(&self) -> String {
        let mut out = self.source.clone();
        for (name, output) in &self.accumulated {
            out = out.replace(&section::placeholder(name), output);
        }
        interpolate(&out, &self.context, &self.transforms)
    }
}

fn read_text(path: &Path) -> Result<String, TemplateError> {
    let bytes = std::fs::read(path).map_err(|e| TemplateError::io(path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}
