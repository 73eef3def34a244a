use regex::Regex;

/// Whole-expression trailing-slash requirement, carried as the final
/// segment of a compiled expression when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailingSlash {
    /// The path must end with a trailing slash.
    Mandatory,
    /// The path may end with or without a trailing slash.
    Optional,
}

/// One compiled unit of a route expression.
///
/// Literal comparisons happen on the decoded form; composition emits the
/// encoded form. A `Wildcard` is only meaningful as the final positional
/// segment; the parser downgrades interior wildcards to plain parameters.
#[derive(Debug, Clone)]
pub enum RouteSegment {
    Literal {
        decoded: String,
        encoded: String,
    },
    Param {
        name: String,
        pattern: Option<Regex>,
    },
    Wildcard {
        name: String,
        pattern: Option<Regex>,
    },
    TrailingSlash(TrailingSlash),
}

impl RouteSegment {
    pub fn param_name(&self) -> Option<&str> {
        match self {
            RouteSegment::Param { name, .. } | RouteSegment::Wildcard { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn is_positional(&self) -> bool {
        !matches!(self, RouteSegment::TrailingSlash(_))
    }
}

impl PartialEq for RouteSegment {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                RouteSegment::Literal {
                    decoded: da,
                    encoded: ea,
                },
                RouteSegment::Literal {
                    decoded: db,
                    encoded: eb,
                },
            ) => da == db && ea == eb,
            (
                RouteSegment::Param {
                    name: na,
                    pattern: pa,
                },
                RouteSegment::Param {
                    name: nb,
                    pattern: pb,
                },
            )
            | (
                RouteSegment::Wildcard {
                    name: na,
                    pattern: pa,
                },
                RouteSegment::Wildcard {
                    name: nb,
                    pattern: pb,
                },
            ) => na == nb && pa.as_ref().map(Regex::as_str) == pb.as_ref().map(Regex::as_str),
            (RouteSegment::TrailingSlash(a), RouteSegment::TrailingSlash(b)) => a == b,
            _ => false,
        }
    }
}

/// A decomposed concrete path: decoded literal segments plus the
/// trailing-slash indicator. Path segments carry no parameter semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPath {
    pub segments: Vec<String>,
    pub trailing_slash: bool,
}
