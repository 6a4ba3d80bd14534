//! PBKDF2 key stretching with a per-process cache of derived keys.

/// Stretches `secret` into `len` bytes of key material for the given purpose label.
///
/// This is deliberately slow; prefer [`KeyGenerator::cache_generate`] outside of tests.
pub fn derive(
    secret: &MasterSecret,
    label: &[u8],
    iterations: u32,
    len: usize,
) -> Result<DerivedKey, ConfigError> {
    let iterations = check_parameters(secret, iterations, len)?;
    Ok(stretch(secret, label, iterations, len))
}

fn check_parameters(
    secret: &MasterSecret,
    iterations: u32,
    len: usize,
) -> Result<NonZeroU32, ConfigError> {
    if secret.is_empty() {
        return Err(ConfigError::EmptySecret);
    }
    if len == 0 {
        return Err(ConfigError::ZeroKeyLength);
    }
    NonZeroU32::new(iterations).ok_or(ConfigError::ZeroIterations)
}

fn stretch(secret: &MasterSecret, label: &[u8], iterations: NonZeroU32, len: usize) -> DerivedKey {
    let start = Instant::now();
    let mut key = DerivedKey(Zeroizing::new(vec![0; len].into_boxed_slice()));
    pbkdf2::<Hmac<Sha256>>(secret.as_bytes(), label, iterations.get(), &mut key.0[..]);
    tracing::debug!(
        label = %String::from_utf8_lossy(label),
        iterations = iterations.get(),
        len,
        elapsed = ?start.elapsed(),
        "derived cookie key",
    );
    key
}

pub struct DerivedKey(Zeroizing<Box<[u8]>>);

impl DerivedKey {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Debug for DerivedKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "DerivedKey({} bytes)", self.0.len())
    }
}

impl PartialEq for DerivedKey {
    fn eq(&self, other: &Self) -> bool {
        // constant-time equality
        self.as_bytes().ct_eq(other.as_bytes()).into()
    }
}

impl Eq for DerivedKey {}

/// Derived keys shared between every user of the same secret and parameters.
///
/// Each entry is computed at most once: concurrent first users of one entry wait for a single
/// derivation, while different entries can be derived in parallel.
#[derive(Default)]
pub struct KeyCache {
    entries: Mutex<HashMap<CacheKey, Arc<OnceLock<Arc<DerivedKey>>>>>,
}

#[derive(PartialEq, Eq, Hash)]
struct CacheKey {
    secret: MasterSecret,
    label: Box<[u8]>,
    iterations: u32,
    len: usize,
}

impl KeyCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache shared by the whole process.
    #[must_use]
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<KeyCache>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    pub fn get_or_derive(
        &self,
        secret: &MasterSecret,
        label: &[u8],
        iterations: u32,
        len: usize,
    ) -> Result<Arc<DerivedKey>, ConfigError> {
        let iterations = check_parameters(secret, iterations, len)?;

        // The map lock is only held to find the entry; derivation happens outside of it.
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            let key = CacheKey {
                secret: secret.clone(),
                label: label.into(),
                iterations: iterations.get(),
                len,
            };
            Arc::clone(entries.entry(key).or_default())
        };

        let key = cell.get_or_init(|| Arc::new(stretch(secret, label, iterations, len)));
        Ok(Arc::clone(key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Debug for KeyCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCache")
            .field("entries", &self.len())
            .finish()
    }
}

/// A master secret paired with the iteration count to stretch it with.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    secret: MasterSecret,
    iterations: u32,
    cache: Arc<KeyCache>,
}

impl KeyGenerator {
    /// Creates a generator backed by the process-wide [`KeyCache`].
    pub fn new(secret: impl Into<MasterSecret>, iterations: u32) -> Self {
        Self::with_cache(secret, iterations, KeyCache::global())
    }

    pub fn with_cache(
        secret: impl Into<MasterSecret>,
        iterations: u32,
        cache: Arc<KeyCache>,
    ) -> Self {
        Self {
            secret: secret.into(),
            iterations,
            cache,
        }
    }

    /// Derives a key without consulting the cache.
    pub fn generate(&self, label: &[u8], len: usize) -> Result<DerivedKey, ConfigError> {
        derive(&self.secret, label, self.iterations, len)
    }

    pub fn cache_generate(&self, label: &[u8], len: usize) -> Result<Arc<DerivedKey>, ConfigError> {
        self.cache
            .get_or_derive(&self.secret, label, self.iterations, len)
    }
}


use crate::ConfigError;
use crate::MasterSecret;
use hmac::Hmac;
use pbkdf2::pbkdf2;
use sha2::Sha256;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;
use std::sync::PoisonError;
use std::time::Instant;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;
