use serde::{Deserialize, Serialize};

use crate::matcher::Bindings;
use crate::segment::{RouteSegment, TrailingSlash};

/// One instruction of a portable composer: a data-only description of path
/// composition that a host without compiled segments can interpret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ComposeOp {
    Literal { value: String },
    Parameter { name: String },
    Wildcard { name: String },
    TrailingSlash,
}

/// A serializable rendition of a route's composition logic. The instruction
/// sequence derives solely from the segment sequence, and `render` produces
/// byte-identical output to [`compose`](super::compose) for the same
/// bindings.
///
/// An optional trailing-slash marker emits nothing and therefore has no
/// instruction; the implicit prologue is the leading delimiter guarantee
/// (a render that emitted nothing yields `/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PortableComposer {
    ops: Vec<ComposeOp>,
}

impl PortableComposer {
    pub fn from_segments(segments: &[RouteSegment]) -> Self {
        let ops = segments
            .iter()
            .filter_map(|segment| match segment {
                RouteSegment::Literal { encoded, .. } => Some(ComposeOp::Literal {
                    value: encoded.clone(),
                }),
                RouteSegment::Param { name, .. } => {
                    Some(ComposeOp::Parameter { name: name.clone() })
                }
                RouteSegment::Wildcard { name, .. } => {
                    Some(ComposeOp::Wildcard { name: name.clone() })
                }
                RouteSegment::TrailingSlash(TrailingSlash::Mandatory) => {
                    Some(ComposeOp::TrailingSlash)
                }
                RouteSegment::TrailingSlash(TrailingSlash::Optional) => None,
            })
            .collect();

        Self { ops }
    }

    pub fn ops(&self) -> &[ComposeOp] {
        &self.ops
    }

    /// Interprets the instruction list against a binding map.
    pub fn render(&self, bindings: &Bindings) -> String {
        let mut out = String::new();

        for op in &self.ops {
            match op {
                ComposeOp::Literal { value } => {
                    out.push('/');
                    out.push_str(value);
                }
                ComposeOp::Parameter { name } => {
                    out.push('/');
                    out.push_str(&super::encode_binding(bindings.get(name.as_str())));
                }
                ComposeOp::Wildcard { name } => {
                    super::emit_list(&mut out, bindings.get(name.as_str()));
                }
                ComposeOp::TrailingSlash => out.push('/'),
            }
        }

        if out.is_empty() {
            out.push('/');
        }

        out
    }
}
