use url::Url;

use crate::errors::RouterResult;
use crate::method::Method;

/// Dispatch input, resolved once at the call boundary: a bare path string,
/// a parsed URL (its path is routed), or a request-shaped pair whose
/// method and pathname are inferred unless overridden by options.
#[derive(Debug, Clone)]
pub enum RouteInput {
    Path(String),
    Url(Url),
    Request { url: String, method: String },
}

impl RouteInput {
    pub(crate) fn resolve(self, options: &DispatchOptions) -> RouterResult<(String, Option<Method>)> {
        match self {
            RouteInput::Path(pathname) => Ok((pathname, options.method)),
            RouteInput::Url(url) => Ok((url.path().to_string(), options.method)),
            RouteInput::Request { url, method } => {
                let inferred = Method::from_token(&method)?;
                let cut = url.find(['?', '#']).unwrap_or(url.len());
                Ok((url[..cut].to_string(), options.method.or(Some(inferred))))
            }
        }
    }
}

impl From<&str> for RouteInput {
    fn from(pathname: &str) -> Self {
        RouteInput::Path(pathname.to_string())
    }
}

impl From<String> for RouteInput {
    fn from(pathname: String) -> Self {
        RouteInput::Path(pathname)
    }
}

impl From<Url> for RouteInput {
    fn from(url: Url) -> Self {
        RouteInput::Url(url)
    }
}

/// Options consumed by dispatch. `method` filters the scanned store (and
/// overrides a request-inferred method); `data` is threaded through to
/// notifications untouched.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    pub method: Option<Method>,
    pub data: Option<serde_json::Value>,
}

impl DispatchOptions {
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_input_infers_method_and_strips_query() {
        let input = RouteInput::Request {
            url: "/dog/brown?age=3#frag".to_string(),
            method: "get".to_string(),
        };
        let (pathname, method) = input.resolve(&DispatchOptions::default()).unwrap();

        assert_eq!(pathname, "/dog/brown");
        assert_eq!(method, Some(Method::Get));
    }

    #[test]
    fn explicit_method_overrides_the_inferred_one() {
        let input = RouteInput::Request {
            url: "/x".to_string(),
            method: "GET".to_string(),
        };
        let options = DispatchOptions::default().with_method(Method::Post);
        let (_, method) = input.resolve(&options).unwrap();

        assert_eq!(method, Some(Method::Post));
    }
}
