mod portable;

pub use portable::{ComposeOp, PortableComposer};

use crate::matcher::{Bindings, BoundValue};
use crate::path::encode_segment;
use crate::segment::{RouteSegment, TrailingSlash};

/// Renders a concrete path from a compiled segment sequence and a binding
/// map. Literals emit their encoded form, parameters the percent-encoded
/// binding (empty when absent), wildcards each encoded element in order; a
/// mandatory trailing-slash marker appends the delimiter. The result is
/// always delimiter-prefixed and never empty.
///
/// For bindings that satisfy the route's constraints this is the exact left
/// inverse of matching.
pub fn compose(segments: &[RouteSegment], bindings: &Bindings) -> String {
    let mut out = String::new();

    for segment in segments {
        match segment {
            RouteSegment::Literal { encoded, .. } => {
                out.push('/');
                out.push_str(encoded);
            }
            RouteSegment::Param { name, .. } => {
                out.push('/');
                out.push_str(&encode_binding(bindings.get(name.as_str())));
            }
            RouteSegment::Wildcard { name, .. } => {
                emit_list(&mut out, bindings.get(name.as_str()));
            }
            RouteSegment::TrailingSlash(TrailingSlash::Mandatory) => out.push('/'),
            RouteSegment::TrailingSlash(TrailingSlash::Optional) => {}
        }
    }

    if out.is_empty() {
        out.push('/');
    }

    out
}

pub(crate) fn encode_binding(value: Option<&BoundValue>) -> String {
    match value {
        None => String::new(),
        Some(value) => encode_segment(&value.to_string()),
    }
}

pub(crate) fn emit_list(out: &mut String, value: Option<&BoundValue>) {
    match value {
        None => {}
        Some(BoundValue::One(single)) => {
            out.push('/');
            out.push_str(&encode_segment(single));
        }
        Some(BoundValue::Many(elements)) => {
            for element in elements {
                out.push('/');
                out.push_str(&encode_segment(element));
            }
        }
    }
}
