use indexmap::IndexMap;
use regex::Regex;

use crate::path::{decode_segment, encode_segment};
use crate::segment::{RouteSegment, TrailingSlash};

use super::{ExpressionError, ExpressionResult};

/// Compiles a route expression into its segment sequence.
///
/// A trailing `/` requests mandatory trailing-slash matching, a trailing
/// `/?` optional; either becomes the final segment. The remainder splits on
/// `/` into literals and `:name`, `:name(pattern)`, `:name*` parameter
/// forms. When `encoded` is set, literal pieces are percent-decoded here so
/// match-time comparisons are always decoded-vs-decoded.
#[tracing::instrument(level = "trace", skip(expression), fields(expression = %expression))]
pub fn parse_expression(expression: &str, encoded: bool) -> ExpressionResult<Vec<RouteSegment>> {
    let (body, trailing) = strip_trailing_marker(expression);
    let body = body.strip_prefix('/').unwrap_or(body);

    let mut segments = Vec::new();
    if !body.is_empty() {
        for (index, piece) in body.split('/').enumerate() {
            segments.push(parse_piece(expression, piece, index + 1, encoded)?);
        }
    }

    downgrade_interior_wildcards(expression, &mut segments);
    reject_duplicate_parameters(expression, &segments)?;

    if let Some(marker) = trailing {
        segments.push(RouteSegment::TrailingSlash(marker));
    }

    Ok(segments)
}

fn strip_trailing_marker(expression: &str) -> (&str, Option<TrailingSlash>) {
    if let Some(rest) = expression.strip_suffix("/?") {
        (rest, Some(TrailingSlash::Optional))
    } else if let Some(rest) = expression.strip_suffix('/') {
        (rest, Some(TrailingSlash::Mandatory))
    } else {
        (expression, None)
    }
}

fn parse_piece(
    expression: &str,
    piece: &str,
    position: usize,
    encoded: bool,
) -> ExpressionResult<RouteSegment> {
    let Some(rest) = piece.strip_prefix(':') else {
        let (decoded, encoded_form) = if encoded {
            (decode_segment(piece), piece.to_string())
        } else {
            (piece.to_string(), encode_segment(piece))
        };
        return Ok(RouteSegment::Literal {
            decoded,
            encoded: encoded_form,
        });
    };

    if rest.is_empty() {
        return Err(ExpressionError::ParameterMissingName {
            expression: expression.to_string(),
            position,
        });
    }

    let bytes = rest.as_bytes();
    if !(bytes[0].is_ascii_alphabetic() || bytes[0] == b'_') {
        return Err(ExpressionError::UnparsableSegment {
            expression: expression.to_string(),
            segment: piece.to_string(),
            position,
        });
    }

    let mut cursor = 1usize;
    while cursor < bytes.len() && (bytes[cursor].is_ascii_alphanumeric() || bytes[cursor] == b'_') {
        cursor += 1;
    }
    let name = rest[..cursor].to_string();

    let mut tail = &rest[cursor..];
    let mut pattern = None;
    if tail.starts_with('(') {
        let (raw, remaining) = scan_constraint(expression, &name, tail)?;
        pattern = Some(compile_constraint(&name, raw)?);
        tail = remaining;
    }

    let wildcard = tail == "*";
    if !wildcard && !tail.is_empty() {
        return Err(ExpressionError::UnparsableSegment {
            expression: expression.to_string(),
            segment: piece.to_string(),
            position,
        });
    }

    Ok(if wildcard {
        RouteSegment::Wildcard { name, pattern }
    } else {
        RouteSegment::Param { name, pattern }
    })
}

/// Scans a `(`-opened inline constraint, honoring nested groups and
/// backslash escapes, and returns the raw pattern plus the unconsumed tail.
fn scan_constraint<'a>(
    expression: &str,
    name: &str,
    tail: &'a str,
) -> ExpressionResult<(&'a str, &'a str)> {
    let bytes = tail.as_bytes();
    let mut depth = 0usize;
    let mut index = 0usize;

    while index < bytes.len() {
        match bytes[index] {
            b'\\' => {
                index += 1;
            }
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&tail[1..index], &tail[index + 1..]));
                }
            }
            _ => {}
        }
        index += 1;
    }

    Err(ExpressionError::UnterminatedConstraint {
        expression: expression.to_string(),
        name: name.to_string(),
    })
}

fn compile_constraint(name: &str, raw: &str) -> ExpressionResult<Regex> {
    Regex::new(&format!("^(?:{raw})$")).map_err(|source| ExpressionError::ConstraintRegexInvalid {
        name: name.to_string(),
        pattern: raw.to_string(),
        source,
    })
}

/// A wildcard marker on a non-final positional parameter does not trigger
/// capture-to-end; the parameter silently becomes a plain one.
fn downgrade_interior_wildcards(expression: &str, segments: &mut [RouteSegment]) {
    let Some(last) = segments.len().checked_sub(1) else {
        return;
    };

    for segment in &mut segments[..last] {
        if let RouteSegment::Wildcard { name, pattern } = segment {
            tracing::event!(
                tracing::Level::DEBUG,
                operation = "downgrade_wildcard",
                expression = %expression,
                param = %name,
            );
            let name = std::mem::take(name);
            let pattern = pattern.take();
            *segment = RouteSegment::Param { name, pattern };
        }
    }
}

fn reject_duplicate_parameters(
    expression: &str,
    segments: &[RouteSegment],
) -> ExpressionResult<()> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for segment in segments {
        if let Some(name) = segment.param_name() {
            *counts.entry(name).or_insert(0) += 1;
        }
    }

    for (name, count) in counts {
        if count > 1 {
            return Err(ExpressionError::DuplicateParameterName {
                expression: expression.to_string(),
                name: name.to_string(),
                count,
            });
        }
    }

    Ok(())
}
