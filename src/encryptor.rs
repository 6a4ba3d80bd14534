/// Encrypts byte payloads into tamper-evident envelope strings and back.
///
/// Creating one is expensive the first time a given secret is seen, since both keys have to be
/// stretched out of it; later instances reuse the keys from the [`KeyCache`](crate::KeyCache).
#[derive(Debug, Clone)]
pub struct AuthenticatedEncryptor {
    keys: CookieKeys,
}

impl AuthenticatedEncryptor {
    pub fn new(generator: &KeyGenerator) -> Result<Self, ConfigError> {
        Ok(Self {
            keys: CookieKeys::derive(generator)?,
        })
    }

    #[must_use]
    pub fn encrypt_and_sign(&self, plaintext: &[u8]) -> String {
        self.encrypt_and_sign_with_rng(&mut rand::thread_rng(), plaintext)
    }

    pub fn encrypt_and_sign_with_rng<R: ?Sized + Rng + CryptoRng>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
    ) -> String {
        Envelope::seal(&self.keys, rng, plaintext).to_string()
    }

    pub fn decrypt_and_verify(&self, envelope: &str) -> Result<Vec<u8>, DecryptError> {
        let result = envelope
            .parse::<Envelope>()
            .map_err(DecryptError::Parse)
            .and_then(|envelope| envelope.open(&self.keys));
        if let Err(e) = &result {
            tracing::debug!(kind = e.kind(), "rejected cookie envelope");
        }
        result
    }
}


use crate::cookie_keys::CookieKeys;
use crate::envelope::Envelope;
use crate::ConfigError;
use crate::DecryptError;
use crate::KeyGenerator;
use rand::CryptoRng;
use rand::Rng;
