mod bindings;

pub use bindings::{Bindings, BoundValue};

use smallvec::SmallVec;

use crate::segment::{ParsedPath, RouteSegment, TrailingSlash};

type CaptureList = SmallVec<[(String, BoundValue); 4]>;

/// Walks compiled route segments against a parsed path and produces the
/// binding map, or `None` when the path does not fit the route shape.
///
/// Matching is purely structural: constraint validation happens after a
/// successful walk, and route ordering is the caller's concern.
#[tracing::instrument(
    level = "trace",
    skip(segments, path),
    fields(segments = segments.len() as u64, path_segments = path.segments.len() as u64)
)]
pub fn match_path(
    segments: &[RouteSegment],
    path: &ParsedPath,
    ignore_case: bool,
) -> Option<Bindings> {
    let trailing = segments.iter().rev().find_map(|segment| match segment {
        RouteSegment::TrailingSlash(marker) => Some(*marker),
        _ => None,
    });
    match trailing {
        Some(TrailingSlash::Mandatory) if !path.trailing_slash => return None,
        None if path.trailing_slash => return None,
        _ => {}
    }

    let positional = match trailing {
        Some(_) => &segments[..segments.len() - 1],
        None => segments,
    };

    let mut captures: CaptureList = SmallVec::new();
    let mut cursor = 0usize;

    for segment in positional {
        match segment {
            RouteSegment::Literal { decoded, .. } => {
                let actual = path.segments.get(cursor)?;
                let equal = if ignore_case {
                    decoded.eq_ignore_ascii_case(actual)
                } else {
                    decoded == actual
                };
                if !equal {
                    return None;
                }
                cursor += 1;
            }
            RouteSegment::Param { name, .. } => {
                let actual = path.segments.get(cursor)?;
                captures.push((name.clone(), BoundValue::One(actual.clone())));
                cursor += 1;
            }
            RouteSegment::Wildcard { name, .. } => {
                // Capture-to-end: everything from here to the effective end,
                // as an ordered (possibly empty) list.
                let rest = path.segments[cursor..].to_vec();
                captures.push((name.clone(), BoundValue::Many(rest)));
                return Some(captures.into_iter().collect());
            }
            RouteSegment::TrailingSlash(_) => {}
        }
    }

    if cursor != path.segments.len() {
        return None;
    }

    Some(captures.into_iter().collect())
}
