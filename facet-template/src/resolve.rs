//! Dotted-path resolution against reflected values.
//!
//! A path such as `user.address.city` names a root binding in the
//! [`Context`] followed by field names. Each field segment is matched
//! against the current record's field names after [`normalize`]-ing both
//! sides, so `first_name`, `FirstName` and `FIRST-NAME` are interchangeable.
//!
//! Resolution never fails: any dead end yields an empty string.

use facet_core::DynValueKind;
use facet_pretty::PrettyPrinter;
use facet_reflect::{HasFields, Peek, PeekDynamicValue, PeekStruct};

use crate::{Context, trace};

/// Lowercases `name` and drops every character that is not a letter or digit.
///
/// Letter numerals (`Ⅻ`) and other numeric symbols (`²`, `½`) are dropped;
/// only ASCII digits count as digits. Each character lowercases to exactly
/// one character, so `İ` becomes `i` rather than `i` plus a combining dot.
pub fn normalize(name: &str) -> String {
    name.chars()
        .filter(|&c| c.is_ascii_digit() || (c.is_alphabetic() && !c.is_numeric()))
        .filter_map(|c| c.to_lowercase().next())
        .collect()
}

/// Resolves a dotted `path` against `context` and renders the result as text.
///
/// Returns an empty string if the root is unbound, if a segment hits a value
/// without named fields, or if no field matches a segment.
pub fn resolve(path: &str, context: &Context) -> String {
    let mut segments = path.split('.');
    let root_name = segments.next().unwrap_or_default();
    let Some(root) = context.get(root_name) else {
        trace!("unresolved root {root_name:?}");
        return String::new();
    };

    let mut current = root;
    for segment in segments {
        let Some(record) = deref(current) else {
            return String::new();
        };
        let Some(field) = lookup_field(record, segment) else {
            trace!("no field matching {segment:?} on {}", record.shape());
            return String::new();
        };
        current = field;
    }
    printable(current)
}

/// Follows pointers (`&T`, `Box`, `Arc`) and `Option`s down to the
/// value they point at. Returns `None` for `None` or an unborrowable pointer.
pub fn deref<'mem, 'facet>(mut peek: Peek<'mem, 'facet>) -> Option<Peek<'mem, 'facet>> {
    loop {
        if let Ok(pointer) = peek.into_pointer() {
            peek = pointer.borrow_inner()?;
        } else if let Ok(option) = peek.into_option() {
            peek = option.value()?;
        } else {
            return Some(peek);
        }
    }
}

/// Finds the field of `record` whose normalized name equals the normalized
/// `segment`.
///
/// Structs, dynamic objects and string-keyed maps count as records; any
/// other value has no fields. A segment matching more than one field is
/// ambiguous and finds nothing.
pub fn lookup_field<'mem, 'facet>(
    record: Peek<'mem, 'facet>,
    segment: &str,
) -> Option<Peek<'mem, 'facet>> {
    let wanted = normalize(segment);

    if let Ok(strukt) = record.into_struct() {
        return struct_field(strukt, &wanted);
    }
    if let Ok(dynamic) = record.into_dynamic_value() {
        return unique(dynamic.object_iter()?, &wanted);
    }
    if let Ok(map) = record.into_map() {
        let entries = map
            .iter()
            .filter_map(|(key, value)| Some((key.as_str()?, value)));
        return unique(entries, &wanted);
    }
    None
}

fn struct_field<'mem, 'facet>(
    strukt: PeekStruct<'mem, 'facet>,
    wanted: &str,
) -> Option<Peek<'mem, 'facet>> {
    let mut level = vec![strukt];
    while !level.is_empty() {
        let mut found = None;
        let mut ambiguous = false;
        let mut flattened = Vec::new();

        for strukt in &level {
            for (field, value) in strukt.fields() {
                if field.is_sensitive() {
                    continue;
                }
                if field.is_flattened() {
                    if let Some(inner) = deref(value).and_then(|v| v.into_struct().ok()) {
                        flattened.push(inner);
                    }
                }
                if normalize(field.name) == wanted {
                    ambiguous |= found.is_some();
                    found = Some(value);
                }
            }
        }

        if ambiguous {
            trace!("field name {wanted:?} is ambiguous");
            return None;
        }
        if found.is_some() {
            return found;
        }
        level = flattened;
    }
    None
}

fn unique<'a, 'mem, 'facet>(
    entries: impl Iterator<Item = (&'a str, Peek<'mem, 'facet>)>,
    wanted: &str,
) -> Option<Peek<'mem, 'facet>> {
    let mut matches = entries.filter(|(name, _)| normalize(name) == wanted);
    let (_, value) = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(value),
    }
}

/// Renders a reflected value as template text.
///
/// Strings come out as-is, `None` and null become empty, and types with a
/// `Display` impl use it. Records, enums and collections are printed field
/// by field with [`PrettyPrinter`], without colors.
pub fn printable(peek: Peek<'_, '_>) -> String {
    // options go first: peeling a `None` through its inner shape panics
    if let Ok(option) = peek.into_option() {
        return option.value().map(printable).unwrap_or_default();
    }
    if let Ok(dynamic) = peek.into_dynamic_value() {
        return printable_dynamic(dynamic);
    }
    if let Some(text) = peek.as_str() {
        return text.to_owned();
    }
    if peek.shape().is_display() {
        return peek.to_string();
    }
    if let Some(inner) = peek.into_pointer().ok().and_then(|p| p.borrow_inner()) {
        return printable(inner);
    }
    pretty(peek)
}

fn pretty(peek: Peek<'_, '_>) -> String {
    PrettyPrinter::new().with_colors(false).format_peek(peek)
}

fn printable_dynamic(dynamic: PeekDynamicValue<'_, '_>) -> String {
    match dynamic.kind() {
        DynValueKind::Null => String::new(),
        DynValueKind::Bool => dynamic.as_bool().map(|b| b.to_string()).unwrap_or_default(),
        DynValueKind::Number => {
            if let Some(n) = dynamic.as_i64() {
                n.to_string()
            } else if let Some(n) = dynamic.as_u64() {
                n.to_string()
            } else {
                dynamic.as_f64().map(|n| n.to_string()).unwrap_or_default()
            }
        }
        DynValueKind::String => dynamic.as_str().unwrap_or_default().to_owned(),
        _ => pretty(dynamic.peek()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_case_and_punctuation() {
        assert_eq!(normalize("FirstName"), "firstname");
        assert_eq!(normalize("first_name"), "firstname");
        assert_eq!(normalize("FIRST-NAME"), "firstname");
        assert_eq!(normalize("first name 2"), "firstname2");
        assert_eq!(normalize("__"), "");
    }

    #[test]
    fn normalize_keeps_non_ascii_letters() {
        assert_eq!(normalize("Größe"), "größe");
        assert_eq!(normalize("ÉTÉ"), "été");
    }

    #[test]
    fn normalize_drops_numeric_symbols() {
        assert_eq!(normalize("level²"), "level");
        assert_eq!(normalize("half½"), "half");
        assert_eq!(normalize("chapterⅫ"), "chapter");
        assert_eq!(normalize("v2"), "v2");
    }

    #[test]
    fn normalize_lowercases_one_to_one() {
        assert_eq!(normalize("İstanbul"), "istanbul");
        assert_eq!(normalize("İ").chars().count(), 1);
    }

    #[test]
    fn unbound_root_is_empty() {
        let context = Context::new();
        assert_eq!(resolve("missing", &context), "");
        assert_eq!(resolve("missing.field", &context), "");
        assert_eq!(resolve("", &context), "");
    }

    #[test]
    fn scalar_root_prints_its_display_form() {
        let mut context = Context::new();
        context.insert("n", 42i64);
        context.insert("flag", true);
        context.insert("name", String::from("Ana"));

        assert_eq!(resolve("n", &context), "42");
        assert_eq!(resolve("flag", &context), "true");
        assert_eq!(resolve("name", &context), "Ana");
    }

    #[test]
    fn segment_on_scalar_is_empty() {
        let mut context = Context::new();
        context.insert("n", 42i64);
        assert_eq!(resolve("n.value", &context), "");
    }
}
