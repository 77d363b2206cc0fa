//! Marker scanning and expression evaluation.
//!
//! A marker is `{{expr}}`, where `expr` is a dotted path optionally followed
//! by `|transform` segments. Markers are replaced left to right; the text
//! between them is copied verbatim.

use crate::{Context, Transforms, resolve, trace};

/// Opens a marker.
pub const OPEN: &str = "{{";

/// Closes a marker.
pub const CLOSE: &str = "}}";

/// Replaces every `{{expr}}` marker in `input` with its evaluated text.
///
/// An unterminated marker stops the scan: the text before it is emitted,
/// followed by the whole unscanned remainder (including that same prefix),
/// so `"abc{{def"` comes out as `"abcabc{{def"`.
pub fn interpolate(input: &str, context: &Context, transforms: &Transforms) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    loop {
        let Some(start) = rest.find(OPEN) else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..start]);

        let Some(end) = rest[start..].find(CLOSE) else {
            trace!("unterminated marker at byte {start} of remainder");
            out.push_str(rest);
            break;
        };

        let expr = &rest[start + OPEN.len()..start + end];
        out.push_str(&eval(expr, context, transforms));
        rest = &rest[start + end + CLOSE.len()..];
    }

    out
}

/// Evaluates a marker expression: resolves the path before the first `|`,
/// then threads the value through each named transform in order.
pub fn eval(expr: &str, context: &Context, transforms: &Transforms) -> String {
    let mut parts = expr.split('|');
    let path = parts.next().unwrap_or_default();
    parts.fold(resolve(path, context), |value, name| {
        transforms.apply(name, value)
    })
}
