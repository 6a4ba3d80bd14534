/// Everything needed to build a [`SessionManager`] for a deployment.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub secret: Secret,

    #[serde(default = "default_iterations")]
    pub iterations: NonZeroU32,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// The trusted domain session cookies are scoped to for non-loopback hosts.
    #[serde(default)]
    pub domain: Option<String>,

    #[serde(default = "returns_true")]
    pub http_only: bool,

    #[serde(default)]
    pub same_site: SameSitePolicy,

    #[serde(default)]
    pub max_age: Option<MaxAge>,

    #[serde(default)]
    pub partitioned: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret: Secret::default(),
            iterations: default_iterations(),
            cookie_name: default_cookie_name(),
            domain: None,
            http_only: true,
            same_site: SameSitePolicy::default(),
            max_age: None,
            partitioned: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.0.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.cookie_name.is_empty() {
            return Err(ConfigError::EmptyCookieName);
        }
        Ok(())
    }

    #[must_use]
    pub fn key_generator(&self) -> KeyGenerator {
        KeyGenerator::new(self.secret.0.as_str(), self.iterations.get())
    }

    /// Attributes every session cookie gets regardless of the request's host.
    #[must_use]
    pub fn base_options(&self) -> CookieOptions {
        CookieOptions {
            http_only: self.http_only,
            same_site: Some(self.same_site.into()),
            max_age: self.max_age.map(|max_age| max_age.0),
            partitioned: self.partitioned,
            ..CookieOptions::default()
        }
    }

    #[must_use]
    pub fn host_policy(&self) -> HostPolicy {
        HostPolicy {
            domain: self.domain.clone(),
            base: self.base_options(),
        }
    }

    /// Derives the cookie keys and assembles a JSON session manager.
    ///
    /// This is where a bad configuration surfaces, so it belongs in startup code.
    pub fn session_manager(&self) -> Result<SessionManager, ConfigError> {
        self.validate()?;
        let encryptor = CookieEncryptor::from_generator(&self.key_generator())?;
        Ok(SessionManager::new(
            SecureCookieStore::json(encryptor),
            self.cookie_name.clone(),
            self.host_policy(),
        ))
    }
}

fn default_iterations() -> NonZeroU32 {
    const DEFAULT: NonZeroU32 = match NonZeroU32::new(100_000) {
        Some(iterations) => iterations,
        None => panic!(),
    };
    DEFAULT
}

fn default_cookie_name() -> String {
    "session".to_owned()
}

fn returns_true() -> bool {
    true
}

/// The master secret as written in configuration. Never printed.
#[derive(Default)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(Zeroizing::new(secret.into()))
    }
}

impl<'de> Deserialize<'de> for Secret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

impl Debug for Secret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => Self::Strict,
            SameSitePolicy::Lax => Self::Lax,
            SameSitePolicy::None => Self::None,
        }
    }
}

pub use max_age::MaxAge;
mod max_age {
    /// A cookie lifetime written as a number of seconds, minutes, hours or days, e.g. `12h`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MaxAge(pub Duration);

    impl<'de> Deserialize<'de> for MaxAge {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_str(Visitor)
        }
    }

    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = MaxAge;
        fn expecting(&self, f: &mut Formatter<'_>) -> fmt::Result {
            f.write_str("a duration such as `30m` or `7d`")
        }
        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            parse(v).ok_or_else(|| de::Error::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    fn parse(s: &str) -> Option<MaxAge> {
        let s = s.trim();

        let multiplier = match s.chars().last()? {
            'd' => 24 * 60 * 60,
            'h' => 60 * 60,
            'm' => 60,
            's' => 1,
            _ => return None,
        };

        let number = s[..s.len() - 1].parse::<i64>().ok()?;
        if number < 0 {
            return None;
        }

        let seconds = number.checked_mul(multiplier)?;

        Some(MaxAge(Duration::seconds(seconds)))
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse(""), None);
        assert_eq!(parse("  "), None);
        assert_eq!(parse("12"), None);
        assert_eq!(parse("-5s"), None);
        assert_eq!(parse("0s"), Some(MaxAge(Duration::ZERO)));
        assert_eq!(parse("5938s"), Some(MaxAge(Duration::seconds(5938))));
        assert_eq!(parse("12m"), Some(MaxAge(Duration::minutes(12))));
        assert_eq!(parse("\t1h\t"), Some(MaxAge(Duration::hours(1))));
        assert_eq!(parse("7d"), Some(MaxAge(Duration::days(7))));
    }

    use serde::de;
    use serde::Deserialize;
    use serde::Deserializer;
    use std::fmt;
    use std::fmt::Formatter;
    use time::Duration;
}

/// A configuration problem that makes it impossible to protect cookies at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    EmptySecret,
    ZeroIterations,
    ZeroKeyLength,
    EmptyCookieName,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySecret => f.write_str("cookie secret must not be empty"),
            Self::ZeroIterations => f.write_str("key derivation needs at least one iteration"),
            Self::ZeroKeyLength => f.write_str("derived keys must not be empty"),
            Self::EmptyCookieName => f.write_str("cookie name must not be empty"),
        }
    }
}

impl Error for ConfigError {}


use crate::CookieEncryptor;
use crate::CookieOptions;
use crate::HostPolicy;
use crate::KeyGenerator;
use crate::SecureCookieStore;
use crate::SessionManager;
use cookie::SameSite;
use serde::Deserialize;
use serde::Deserializer;
use std::error::Error;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::num::NonZeroU32;
use zeroize::Zeroizing;
