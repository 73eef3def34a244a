use indexmap::IndexMap;
use std::fmt;

/// Parameter name to matched value(s), freshly allocated per match.
pub type Bindings = IndexMap<String, BoundValue>;

/// A matched parameter value: one decoded segment, or the ordered list of
/// remaining decoded segments captured by a wildcard parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundValue {
    One(String),
    Many(Vec<String>),
}

impl BoundValue {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            BoundValue::One(value) => Some(value),
            BoundValue::Many(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            BoundValue::One(_) => None,
            BoundValue::Many(values) => Some(values),
        }
    }
}

impl fmt::Display for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::One(value) => f.write_str(value),
            BoundValue::Many(values) => f.write_str(&values.join("/")),
        }
    }
}

impl From<&str> for BoundValue {
    fn from(value: &str) -> Self {
        BoundValue::One(value.to_string())
    }
}

impl From<String> for BoundValue {
    fn from(value: String) -> Self {
        BoundValue::One(value)
    }
}

impl From<Vec<String>> for BoundValue {
    fn from(values: Vec<String>) -> Self {
        BoundValue::Many(values)
    }
}

impl From<Vec<&str>> for BoundValue {
    fn from(values: Vec<&str>) -> Self {
        BoundValue::Many(values.into_iter().map(str::to_string).collect())
    }
}
