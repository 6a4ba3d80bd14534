/// The pair of keys protecting cookie envelopes: one for AES-256-CBC and one for HMAC-SHA256.
#[derive(Clone)]
pub(crate) struct CookieKeys {
    encryption: Arc<DerivedKey>,
    signing: Arc<DerivedKey>,
}

impl CookieKeys {
    pub(crate) const ENCRYPTION_LABEL: &'static [u8] = b"encrypted cookie";
    pub(crate) const SIGNING_LABEL: &'static [u8] = b"signed encrypted cookie";
    pub(crate) const ENCRYPTION_LEN: usize = 32;
    pub(crate) const SIGNING_LEN: usize = 64;

    pub(crate) fn derive(generator: &KeyGenerator) -> Result<Self, ConfigError> {
        Ok(Self {
            encryption: generator.cache_generate(Self::ENCRYPTION_LABEL, Self::ENCRYPTION_LEN)?,
            signing: generator.cache_generate(Self::SIGNING_LABEL, Self::SIGNING_LEN)?,
        })
    }

    pub(crate) fn encryption_key(&self) -> &[u8; Self::ENCRYPTION_LEN] {
        self.encryption
            .as_bytes()
            .try_into()
            .expect("encryption key is derived with a fixed length")
    }

    pub(crate) fn signing_key(&self) -> &[u8; Self::SIGNING_LEN] {
        self.signing
            .as_bytes()
            .try_into()
            .expect("signing key is derived with a fixed length")
    }
}

impl Debug for CookieKeys {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("CookieKeys(..)")
    }
}

use crate::key_derivation::DerivedKey;
use crate::ConfigError;
use crate::KeyGenerator;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;
