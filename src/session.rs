//! Sessions kept entirely inside a secure cookie.

/// Application state that travels in the session cookie.
pub trait Session {
    /// Checks that the session belongs with the request carrying it, for example by comparing a
    /// fingerprint recorded in the session with the request's headers.
    fn validate(&self, request: &dyn CookieRequest) -> Result<(), ValidationError>;
}

/// A session that decoded correctly but does not belong with the request.
#[derive(Debug)]
pub struct ValidationError {
    reason: Cow<'static, str>,
}

impl ValidationError {
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "session rejected: {}", self.reason)
    }
}

impl Error for ValidationError {}

/// Chooses the attributes of the session cookie from the host a request was sent to.
pub trait AttributePolicy {
    fn options(&self, host: Option<&str>) -> CookieOptions;
}

impl<F: Fn(Option<&str>) -> CookieOptions> AttributePolicy for F {
    fn options(&self, host: Option<&str>) -> CookieOptions {
        self(host)
    }
}

/// The default policy: loopback hosts get a plain cookie so that development works without TLS,
/// every other host gets a `Secure` cookie scoped to the trusted domain.
#[derive(Debug, Clone, Default)]
pub struct HostPolicy {
    pub domain: Option<String>,
    /// Attributes shared by both kinds of host, such as `HttpOnly` and `SameSite`.
    pub base: CookieOptions,
}

impl AttributePolicy for HostPolicy {
    fn options(&self, host: Option<&str>) -> CookieOptions {
        let mut options = self.base.clone();
        options.path = Some("/".to_owned());
        if host.map_or(false, is_loopback) {
            options.secure = false;
            options.domain = None;
        } else {
            options.secure = true;
            options.domain = self.domain.clone();
        }
        options
    }
}

fn is_loopback(host: &str) -> bool {
    let name = match host.strip_prefix('[') {
        Some(bracketed) => match bracketed.split_once(']') {
            Some((ip, _)) => ip,
            None => return false,
        },
        None => match host.rsplit_once(':') {
            Some((name, port)) if port.bytes().all(|b| b.is_ascii_digit()) => name,
            _ => host,
        },
    };

    if name.eq_ignore_ascii_case("localhost") {
        return true;
    }
    if let Some((_, tld)) = name.rsplit_once('.') {
        if tld.eq_ignore_ascii_case("localhost") {
            return true;
        }
    }
    name.parse::<IpAddr>().map_or(false, |ip| ip.is_loopback())
}

/// Binds a [`SecureCookieStore`] to the session of each request.
#[derive(Debug, Clone)]
pub struct SessionManager<E = JsonEncoder, P = HostPolicy> {
    store: SecureCookieStore<E>,
    name: String,
    policy: P,
}

impl<E, P: AttributePolicy> SessionManager<E, P> {
    pub fn new(store: SecureCookieStore<E>, name: impl Into<String>, policy: P) -> Self {
        Self {
            store,
            name: name.into(),
            policy,
        }
    }

    #[must_use]
    pub fn cookie_name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn store(&self) -> &SecureCookieStore<E> {
        &self.store
    }

    #[must_use]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Loads the request's session, accepting it only if it validates against the request.
    pub fn current<S, Req>(&self, request: &Req) -> Result<S, CurrentError>
    where
        S: Session,
        E: Encoder<S>,
        Req: CookieRequest,
    {
        let session = self
            .store
            .get::<S, _>(request, &self.name)
            .map_err(|e| match e {
                GetError::NotFound(e) => CurrentError::NotFound(e),
                e => {
                    tracing::debug!(cookie = %self.name, kind = e.kind(), "invalid session cookie");
                    CurrentError::Invalid(e)
                }
            })?;

        session.validate(request).map_err(|e| {
            tracing::debug!(cookie = %self.name, reason = e.reason(), "session failed validation");
            CurrentError::Rejected(e)
        })?;

        Ok(session)
    }

    pub fn state<S, Req>(&self, request: &Req) -> SessionState<S>
    where
        S: Session,
        E: Encoder<S>,
        Req: CookieRequest,
    {
        match self.current(request) {
            Ok(session) => SessionState::Valid(session),
            Err(CurrentError::NotFound(_)) => SessionState::Absent,
            Err(e) => SessionState::Invalid(e),
        }
    }

    /// Loads the request's session, starting a new one if there is no valid session.
    pub fn current_or_else<S, Req, F>(&self, request: &Req, new: F) -> S
    where
        S: Session,
        E: Encoder<S>,
        Req: CookieRequest,
        F: FnOnce(&Req) -> S,
    {
        match self.state(request) {
            SessionState::Valid(session) => session,
            SessionState::Absent | SessionState::Invalid(_) => new(request),
        }
    }

    /// Replaces the session stored on the client with `session`.
    pub fn update<S, Req, Res>(
        &self,
        response: &mut Res,
        request: &Req,
        session: &S,
    ) -> Result<Cookie<'static>, SetError>
    where
        E: Encoder<S>,
        Req: ?Sized + CookieRequest,
        Res: ?Sized + CookieResponse,
    {
        let options = self.policy.options(request.host());
        self.store.set(response, &self.name, &options, session)
    }

    /// Ends the session by telling the client to discard the cookie.
    pub fn clear<Req, Res>(&self, response: &mut Res, request: &Req) -> Cookie<'static>
    where
        Req: ?Sized + CookieRequest,
        Res: ?Sized + CookieResponse,
    {
        let options = self.policy.options(request.host());
        self.store.delete(response, &self.name, &options)
    }
}

#[derive(Debug)]
pub enum SessionState<S> {
    Absent,
    Valid(S),
    Invalid(CurrentError),
}

/// Why a request has no usable session.
///
/// Every variant but `NotFound` displays the same message, so it can be shown to clients without
/// revealing which check failed.
#[derive(Debug)]
pub enum CurrentError {
    NotFound(NotFound),
    Invalid(GetError),
    Rejected(ValidationError),
}

impl CurrentError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl Display for CurrentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(_) => f.write_str("no session"),
            Self::Invalid(_) | Self::Rejected(_) => f.write_str("no valid session"),
        }
    }
}

impl Error for CurrentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(e) => Some(e),
            Self::Invalid(e) => Some(e),
            Self::Rejected(e) => Some(e),
        }
    }
}


use crate::store::GetError;
use crate::store::NotFound;
use crate::store::SetError;
use crate::CookieOptions;
use crate::CookieRequest;
use crate::CookieResponse;
use crate::Encoder;
use crate::JsonEncoder;
use crate::SecureCookieStore;
use cookie::Cookie;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::net::IpAddr;
