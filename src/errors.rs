use crate::expression::ExpressionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Expression(#[from] ExpressionError),
    #[error("route name '{name}' is already registered")]
    DuplicateRouteName { name: String },
    #[error("no route named '{name}' is registered")]
    UnknownRouteName { name: String },
    #[error("unrecognized HTTP method token '{token}'")]
    UnrecognizedMethod { token: String },
    #[error("bindings for route '{route}' were rejected by its constraints")]
    BindingsRejected { route: String },
    #[error("parameter '{parameter}' value '{value}' violates the constraints of route '{route}'")]
    ParameterRejected {
        route: String,
        parameter: String,
        value: String,
    },
}

pub type RouterResult<T> = Result<T, RouterError>;
