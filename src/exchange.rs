//! The parts of an HTTP exchange that cookie handling needs.

/// An incoming request that cookies can be read from.
pub trait CookieRequest {
    fn uri(&self) -> &Uri;
    fn headers(&self) -> &HeaderMap;

    /// Finds the first cookie called `name` across all `Cookie` headers.
    fn cookie(&self, name: &str) -> Option<Cookie<'static>> {
        self.headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| Cookie::split_parse(value))
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == name)
            .map(Cookie::into_owned)
    }

    /// The host the request was addressed to, including any port.
    fn host(&self) -> Option<&str> {
        if let Some(authority) = self.uri().authority() {
            return Some(authority.as_str().rsplit('@').next().unwrap_or_default());
        }
        self.header(header::HOST.as_str())
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers().get(name)?.to_str().ok()
    }
}

impl<B> CookieRequest for Request<B> {
    fn uri(&self) -> &Uri {
        Request::uri(self)
    }
    fn headers(&self) -> &HeaderMap {
        Request::headers(self)
    }
}

impl CookieRequest for request::Parts {
    fn uri(&self) -> &Uri {
        &self.uri
    }
    fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// An outgoing response that cookies can be attached to.
pub trait CookieResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Appends a `Set-Cookie` header, keeping any set earlier.
    fn set_cookie(&mut self, cookie: &Cookie<'_>) -> Result<(), InvalidHeaderValue> {
        let value = HeaderValue::try_from(cookie.to_string())?;
        self.headers_mut().append(header::SET_COOKIE, value);
        Ok(())
    }
}

impl<B> CookieResponse for Response<B> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        Response::headers_mut(self)
    }
}

impl CookieResponse for response::Parts {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }
}

impl CookieResponse for HeaderMap {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        self
    }
}


use cookie::Cookie;
use http::header;
use http::header::InvalidHeaderValue;
use http::request;
use http::response;
use http::HeaderMap;
use http::HeaderValue;
use http::Request;
use http::Response;
use http::Uri;
