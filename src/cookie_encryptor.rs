/// Encrypts and signs the value of individual cookies, leaving every other attribute untouched.
#[derive(Debug, Clone)]
pub struct CookieEncryptor {
    encryptor: AuthenticatedEncryptor,
}

impl CookieEncryptor {
    /// Creates a cookie encryptor by deriving both cookie keys from `secret`.
    ///
    /// This is expensive the first time a secret is used in a process.
    pub fn new(secret: impl Into<MasterSecret>, iterations: u32) -> Result<Self, ConfigError> {
        Self::from_generator(&KeyGenerator::new(secret, iterations))
    }

    pub fn from_generator(generator: &KeyGenerator) -> Result<Self, ConfigError> {
        Ok(Self::from(AuthenticatedEncryptor::new(generator)?))
    }

    /// Replaces the cookie's plaintext value with its envelope.
    pub fn protect(&self, cookie: &mut Cookie<'_>) {
        let envelope = self.encryptor.encrypt_and_sign(cookie.value().as_bytes());
        cookie.set_value(envelope);
    }

    /// Sets the cookie's value to the envelope of an arbitrary byte payload.
    pub fn protect_payload(&self, cookie: &mut Cookie<'_>, payload: &[u8]) {
        cookie.set_value(self.encryptor.encrypt_and_sign(payload));
    }

    /// Verifies the cookie's envelope and returns the plaintext it protects.
    ///
    /// An empty value is treated as a missing cookie rather than a forgery.
    pub fn reveal(&self, cookie: &Cookie<'_>) -> Result<Vec<u8>, RevealError> {
        if cookie.value().is_empty() {
            return Err(RevealError::Absent(Absent));
        }
        self.encryptor
            .decrypt_and_verify(cookie.value())
            .map_err(RevealError::Decrypt)
    }
}

impl From<AuthenticatedEncryptor> for CookieEncryptor {
    fn from(encryptor: AuthenticatedEncryptor) -> Self {
        Self { encryptor }
    }
}

#[derive(Debug)]
pub enum RevealError {
    Absent(Absent),
    Decrypt(DecryptError),
}

impl Display for RevealError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent(e) => Display::fmt(e, f),
            Self::Decrypt(e) => Display::fmt(e, f),
        }
    }
}

impl Error for RevealError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Absent(_) => None,
            Self::Decrypt(e) => e.source(),
        }
    }
}

#[derive(Debug)]
pub struct Absent;

impl Display for Absent {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("cookie not present")
    }
}

impl Error for Absent {}

#[cfg(test)]
mod tests {
    fn cookie_encryptor() -> CookieEncryptor {
        let generator = KeyGenerator::with_cache("secret", 10, Arc::new(KeyCache::new()));
        CookieEncryptor::from_generator(&generator).unwrap()
    }

    #[test]
    fn protect_then_reveal() {
        let encryptor = cookie_encryptor();
        let mut cookie = Cookie::new("sess", "plain value");
        cookie.set_path("/");
        cookie.set_http_only(true);

        encryptor.protect(&mut cookie);
        assert_ne!(cookie.value(), "plain value");
        assert!(!cookie.value().contains("plain"));
        assert_eq!(cookie.name(), "sess");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));

        assert_eq!(encryptor.reveal(&cookie).unwrap(), b"plain value");
    }

    #[test]
    fn binary_payload() {
        let encryptor = cookie_encryptor();
        let mut cookie = Cookie::new("sess", "");
        encryptor.protect_payload(&mut cookie, &[0, 159, 146, 150]);
        assert_eq!(encryptor.reveal(&cookie).unwrap(), [0, 159, 146, 150]);
    }

    #[test]
    fn empty_value_is_absent() {
        let encryptor = cookie_encryptor();
        assert!(matches!(
            encryptor.reveal(&Cookie::new("sess", "")),
            Err(RevealError::Absent(_))
        ));
    }

    #[test]
    fn tampered_value_is_not_absent() {
        let encryptor = cookie_encryptor();
        let mut cookie = Cookie::new("sess", "value");
        encryptor.protect(&mut cookie);
        let mut value = cookie.value().to_owned();
        value.push('A');
        cookie.set_value(value);
        assert!(matches!(
            encryptor.reveal(&cookie),
            Err(RevealError::Decrypt(_))
        ));
    }

    use super::CookieEncryptor;
    use super::RevealError;
    use crate::KeyCache;
    use crate::KeyGenerator;
    use cookie::Cookie;
    use std::sync::Arc;
}

use crate::AuthenticatedEncryptor;
use crate::ConfigError;
use crate::DecryptError;
use crate::KeyGenerator;
use crate::MasterSecret;
use cookie::Cookie;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
