/// The process-wide secret every cookie key is derived from.
///
/// The bytes are wiped on drop and never appear in `Debug` output.
#[derive(Clone)]
pub struct MasterSecret(Zeroizing<Box<[u8]>>);

impl MasterSecret {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for MasterSecret {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes())
    }
}

impl From<String> for MasterSecret {
    fn from(secret: String) -> Self {
        Self::new(secret.into_bytes().into_boxed_slice())
    }
}

impl Debug for MasterSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("MasterSecret(..)")
    }
}

impl PartialEq for MasterSecret {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for MasterSecret {}

impl ConstantTimeEq for MasterSecret {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.as_bytes().ct_eq(other.as_bytes())
    }
}

impl Hash for MasterSecret {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}


use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;
