//! Section delimiters and placeholder tokens.
//!
//! A section is the text between `[[name]]` and `[[/name]]`. Extraction
//! swaps the whole span for a placeholder token, `{{__name__}}`, which the
//! final render pass replaces with the section's accumulated output.

/// The literal marker `{{name}}`, without transforms.
pub fn marker(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// The token left in the source where section `name` was extracted.
pub fn placeholder(name: &str) -> String {
    format!("{{{{__{name}__}}}}")
}

/// Opening delimiter of section `name`.
pub fn open_delimiter(name: &str) -> String {
    format!("[[{name}]]")
}

/// Closing delimiter of section `name`.
pub fn close_delimiter(name: &str) -> String {
    format!("[[/{name}]]")
}

/// Result of pulling a section out of a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Text strictly between the delimiters.
    pub body: String,
    /// The source with the delimited span replaced by the placeholder token.
    pub source: String,
}

/// Extracts section `name` from `source`.
///
/// Uses the first occurrence of each delimiter. Returns `None` when either
/// delimiter is missing or the closing one does not come after the opening
/// one. Nested sections with the same name are not supported.
pub fn extract(source: &str, name: &str) -> Option<Extracted> {
    let open = open_delimiter(name);
    let close = close_delimiter(name);

    let start = source.find(&open)?;
    let end = source.find(&close)?;
    let body_start = start + open.len();
    if end < body_start {
        return None;
    }

    let mut rest = String::with_capacity(source.len());
    rest.push_str(&source[..start]);
    rest.push_str(&placeholder(name));
    rest.push_str(&source[end + close.len()..]);

    Some(Extracted {
        body: source[body_start..end].to_owned(),
        source: rest,
    })
}
