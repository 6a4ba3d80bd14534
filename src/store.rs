/// Sets, reads and deletes named cookies whose values are encoded, encrypted and signed.
#[derive(Debug, Clone)]
pub struct SecureCookieStore<E = JsonEncoder> {
    encryptor: CookieEncryptor,
    encoder: E,
}

/// The largest `name=value` pair browsers are guaranteed to keep.
pub const MAX_COOKIE_LEN: usize = 4096;

impl<E> SecureCookieStore<E> {
    pub fn new(encryptor: CookieEncryptor, encoder: E) -> Self {
        Self { encryptor, encoder }
    }

    #[must_use]
    pub fn encryptor(&self) -> &CookieEncryptor {
        &self.encryptor
    }

    /// Stores `value` in the cookie `name` on the response and returns the cookie that was sent.
    ///
    /// Nothing is written to the response unless the whole cookie could be built.
    pub fn set<T, Res>(
        &self,
        response: &mut Res,
        name: &str,
        options: &CookieOptions,
        value: &T,
    ) -> Result<Cookie<'static>, SetError>
    where
        E: Encoder<T>,
        Res: ?Sized + CookieResponse,
    {
        let payload = self.encoder.encode(value).map_err(SetError::Encode)?;

        let mut cookie = Cookie::new(name.to_owned(), "");
        options.apply(&mut cookie);
        self.encryptor.protect_payload(&mut cookie, &payload);

        let len = cookie.name().len() + 1 + cookie.value().len();
        if len > MAX_COOKIE_LEN {
            return Err(SetError::TooLarge(TooLarge { len }));
        }

        response.set_cookie(&cookie).map_err(SetError::Header)?;
        Ok(cookie)
    }

    /// Reads the cookie `name` from the request, verifies it and decodes its payload.
    pub fn get<T, Req>(&self, request: &Req, name: &str) -> Result<T, GetError>
    where
        E: Encoder<T>,
        Req: ?Sized + CookieRequest,
    {
        let cookie = request.cookie(name).ok_or(GetError::NotFound(NotFound))?;
        let payload = self.encryptor.reveal(&cookie).map_err(|e| match e {
            RevealError::Absent(_) => GetError::NotFound(NotFound),
            RevealError::Decrypt(e) => GetError::Decrypt(e),
        })?;
        self.encoder.decode(payload).map_err(GetError::Decode)
    }

    /// Tells the client to discard the cookie `name`.
    ///
    /// Clients are free to ignore this, so there is nothing to report back other than the cookie
    /// that was sent.
    pub fn delete<Res>(
        &self,
        response: &mut Res,
        name: &str,
        options: &CookieOptions,
    ) -> Cookie<'static>
    where
        Res: ?Sized + CookieResponse,
    {
        // The attributes have to match the ones the cookie was set with, or clients keep it.
        let mut cookie = Cookie::new(name.to_owned(), "");
        options.apply(&mut cookie);
        cookie.set_max_age(Duration::seconds(-1));
        cookie.set_expires(OffsetDateTime::UNIX_EPOCH);

        if let Err(e) = response.set_cookie(&cookie) {
            tracing::warn!(name, error = %e, "could not emit cookie deletion");
        }
        cookie
    }
}

impl SecureCookieStore<JsonEncoder> {
    pub fn json(encryptor: CookieEncryptor) -> Self {
        Self::new(encryptor, JsonEncoder)
    }
}

#[derive(Debug)]
pub enum SetError {
    Encode(EncodeError),
    TooLarge(TooLarge),
    Header(InvalidHeaderValue),
}

impl Display for SetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("failed to set cookie")
    }
}

impl Error for SetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(e) => Some(e),
            Self::TooLarge(e) => Some(e),
            Self::Header(e) => Some(e),
        }
    }
}

#[derive(Debug)]
pub struct TooLarge {
    pub len: usize,
}

impl Display for TooLarge {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cookie is {} bytes, more than the limit of {MAX_COOKIE_LEN}",
            self.len
        )
    }
}

impl Error for TooLarge {}

#[derive(Debug)]
pub enum GetError {
    NotFound(NotFound),
    Decrypt(DecryptError),
    Decode(DecodeError),
}

impl GetError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not found",
            Self::Decrypt(e) => e.kind(),
            Self::Decode(_) => "decode",
        }
    }
}

impl Display for GetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(e) => Display::fmt(e, f),
            Self::Decrypt(_) | Self::Decode(_) => f.write_str("invalid cookie"),
        }
    }
}

impl Error for GetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Decrypt(e) => Some(e),
            Self::Decode(e) => Some(e),
        }
    }
}

#[derive(Debug)]
pub struct NotFound;

impl Display for NotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("cookie not present")
    }
}

impl Error for NotFound {}


use crate::cookie_encryptor::RevealError;
use crate::encoder::DecodeError;
use crate::encoder::EncodeError;
use crate::CookieEncryptor;
use crate::CookieOptions;
use crate::CookieRequest;
use crate::CookieResponse;
use crate::DecryptError;
use crate::Encoder;
use crate::JsonEncoder;
use cookie::Cookie;
use http::header::InvalidHeaderValue;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use time::Duration;
use time::OffsetDateTime;
