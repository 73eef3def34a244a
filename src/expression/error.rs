use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExpressionError {
    #[error("segment #{position} in '{expression}' has a parameter marker but no name")]
    ParameterMissingName { expression: String, position: usize },
    #[error("segment #{position} ('{segment}') in '{expression}' is neither a literal nor a parameter")]
    UnparsableSegment {
        expression: String,
        segment: String,
        position: usize,
    },
    #[error("inline constraint for parameter '{name}' in '{expression}' is missing its closing parenthesis")]
    UnterminatedConstraint { expression: String, name: String },
    #[error("inline constraint '{pattern}' for parameter '{name}' is not a valid regular expression")]
    ConstraintRegexInvalid {
        name: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("parameter '{name}' appears {count} times in '{expression}'")]
    DuplicateParameterName {
        expression: String,
        name: String,
        count: usize,
    },
}

pub type ExpressionResult<T> = Result<T, ExpressionError>;
