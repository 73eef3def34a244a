use crate::errors::RouterError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
    Patch = 4,
    Head = 5,
    Options = 6,
}

impl Method {
    pub(crate) const COUNT: usize = 7;

    pub const ALL: [Method; Method::COUNT] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Patch,
        Method::Head,
        Method::Options,
    ];

    /// Resolves a caller-supplied method token, case-insensitively. An
    /// unrecognized token is a synchronous error, not a no-match.
    pub fn from_token(token: &str) -> Result<Self, RouterError> {
        for method in Self::ALL {
            if token.eq_ignore_ascii_case(method.as_str()) {
                return Ok(method);
            }
        }

        Err(RouterError::UnrecognizedMethod {
            token: token.to_string(),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = RouterError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::from_token(token)
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodSet: u8 {
        const GET = 1 << 0;
        const POST = 1 << 1;
        const PUT = 1 << 2;
        const DELETE = 1 << 3;
        const PATCH = 1 << 4;
        const HEAD = 1 << 5;
        const OPTIONS = 1 << 6;
    }
}

impl MethodSet {
    pub fn contains_method(self, method: Method) -> bool {
        self.contains(MethodSet::from(method))
    }

    pub fn methods(self) -> impl Iterator<Item = Method> {
        Method::ALL
            .into_iter()
            .filter(move |method| self.contains_method(*method))
    }
}

impl From<Method> for MethodSet {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => MethodSet::GET,
            Method::Post => MethodSet::POST,
            Method::Put => MethodSet::PUT,
            Method::Delete => MethodSet::DELETE,
            Method::Patch => MethodSet::PATCH,
            Method::Head => MethodSet::HEAD,
            Method::Options => MethodSet::OPTIONS,
        }
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        iter.into_iter()
            .fold(MethodSet::empty(), |set, method| set | MethodSet::from(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_tokens_case_insensitively() {
        assert_eq!(Method::from_token("get").unwrap(), Method::Get);
        assert_eq!(Method::from_token("DELETE").unwrap(), Method::Delete);
    }

    #[test]
    fn rejects_unknown_token() {
        let err = Method::from_token("BREW").expect_err("unknown token should fail");
        match err {
            RouterError::UnrecognizedMethod { token } => assert_eq!(token, "BREW"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn method_set_collects_and_iterates() {
        let set: MethodSet = [Method::Get, Method::Head].into_iter().collect();
        assert!(set.contains_method(Method::Get));
        assert!(!set.contains_method(Method::Post));
        assert_eq!(set.methods().collect::<Vec<_>>(), vec![Method::Get, Method::Head]);
    }
}
