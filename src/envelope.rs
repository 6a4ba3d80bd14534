//! The on-the-wire form of an encrypted cookie value.
//!
//! An envelope is written as `1.<iv>|<ciphertext>|<mac>`: the suite version, then three unpadded
//! URL-safe base 64 segments. Suite 1 is AES-256-CBC with PKCS#7 padding, authenticated by
//! HMAC-SHA256 over the IV followed by the ciphertext.

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Envelope {
    iv: [u8; IV_LEN],
    ciphertext: Vec<u8>,
    mac: [u8; MAC_LEN],
}

const SUITE_VERSION: u32 = 1;
const IV_LEN: usize = 16;
const MAC_LEN: usize = 32;
const BLOCK_LEN: usize = 16;

impl Display for Envelope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&SUITE_VERSION, f)?;
        f.write_str(".")?;
        Base64Display::with_config(&self.iv, base64::URL_SAFE_NO_PAD).fmt(f)?;
        f.write_str("|")?;
        Base64Display::with_config(&self.ciphertext, base64::URL_SAFE_NO_PAD).fmt(f)?;
        f.write_str("|")?;
        Base64Display::with_config(&self.mac, base64::URL_SAFE_NO_PAD).fmt(f)?;
        Ok(())
    }
}

impl FromStr for Envelope {
    type Err = ParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (version, rest) = s.split_once('.').ok_or(ParseErrorInner::NoDot)?;
        if version != "1" {
            return Err(ParseErrorInner::UnsupportedVersion(version.parse::<u32>().ok()).into());
        }

        let mut parts = rest.splitn(3, '|');
        let (iv, ciphertext, mac) = (|| Some((parts.next()?, parts.next()?, parts.next()?)))()
            .ok_or(ParseErrorInner::NotEnoughSegments)?;
        if mac.contains('|') {
            return Err(ParseErrorInner::UnexpectedSegment.into());
        }

        let iv = base64_decode_array(iv).map_err(ParseErrorInner::InvalidIv)?;
        let ciphertext = base64::decode_config(ciphertext, base64::URL_SAFE_NO_PAD)
            .map_err(ParseErrorInner::InvalidCiphertext)?;
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
            return Err(ParseErrorInner::CiphertextLength(ciphertext.len()).into());
        }
        let mac = base64_decode_array(mac).map_err(ParseErrorInner::InvalidMac)?;

        Ok(Self {
            iv,
            ciphertext,
            mac,
        })
    }
}

impl Envelope {
    pub(crate) fn seal<R: ?Sized + Rng + CryptoRng>(
        keys: &CookieKeys,
        rng: &mut R,
        plaintext: &[u8],
    ) -> Self {
        let iv = rng.gen::<[u8; IV_LEN]>();

        let ciphertext =
            <cbc::Encryptor<aes::Aes256>>::new(keys.encryption_key().into(), &iv.into())
                .encrypt_padded_vec_mut::<block_padding::Pkcs7>(plaintext);

        let mac = Self::mac(keys, &iv, &ciphertext)
            .finalize()
            .into_bytes()
            .into();

        Self {
            iv,
            ciphertext,
            mac,
        }
    }

    fn mac(keys: &CookieKeys, iv: &[u8; IV_LEN], ciphertext: &[u8]) -> Hmac<Sha256> {
        <Hmac<Sha256>>::new_from_slice(keys.signing_key())
            .expect("hmac supports any size of key")
            .chain_update(iv)
            .chain_update(ciphertext)
    }

    fn verify(&self, keys: &CookieKeys) -> Result<(), IntegrityError> {
        Self::mac(keys, &self.iv, &self.ciphertext)
            .verify(&self.mac.into())
            .map_err(IntegrityError)
    }

    /// Checks the MAC and only then decrypts.
    pub(crate) fn open(&self, keys: &CookieKeys) -> Result<Vec<u8>, DecryptError> {
        self.verify(keys).map_err(DecryptError::Integrity)?;

        let mut buf = vec![0; self.ciphertext.len()];
        let len = <cbc::Decryptor<aes::Aes256>>::new(keys.encryption_key().into(), &self.iv.into())
            .decrypt_padded_b2b_mut::<block_padding::Pkcs7>(&self.ciphertext, &mut buf)
            .map_err(DecryptError::Unpadding)?
            .len();
        buf.truncate(len);
        Ok(buf)
    }
}

impl Debug for Envelope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        struct Hex<'bytes>(&'bytes [u8]);
        impl Debug for Hex<'_> {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str("0x")?;
                for byte in self.0 {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
        }

        f.debug_struct("Envelope")
            .field("iv", &Hex(&self.iv))
            .field("ciphertext", &Hex(&self.ciphertext))
            .field("mac", &Hex(&self.mac))
            .finish()
    }
}

/// The cookie value is not a well-formed envelope.
#[derive(Debug)]
pub struct ParseError(ParseErrorInner);

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("failed to parse cookie envelope")
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

#[derive(Debug)]
enum ParseErrorInner {
    NoDot,
    UnsupportedVersion(Option<u32>),
    NotEnoughSegments,
    UnexpectedSegment,
    InvalidIv(base64_decode_array::Error),
    InvalidCiphertext(base64::DecodeError),
    CiphertextLength(usize),
    InvalidMac(base64_decode_array::Error),
}

impl Display for ParseErrorInner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoDot => f.write_str("no dot"),
            Self::UnsupportedVersion(Some(v)) => write!(f, "unsupported envelope version {v}"),
            Self::UnsupportedVersion(None) => f.write_str("unsupported envelope version"),
            Self::NotEnoughSegments => f.write_str("not enough pipe-separated segments"),
            Self::UnexpectedSegment => f.write_str("unexpected pipe-separated segment at end"),
            Self::InvalidIv(_) => f.write_str("IV is invalid"),
            Self::InvalidCiphertext(_) => f.write_str("ciphertext is invalid"),
            Self::CiphertextLength(len) => {
                write!(f, "ciphertext length {len} is not a whole number of blocks")
            }
            Self::InvalidMac(_) => f.write_str("MAC is invalid"),
        }
    }
}

impl Error for ParseErrorInner {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidIv(e) | Self::InvalidMac(e) => Some(e),
            Self::InvalidCiphertext(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseErrorInner> for ParseError {
    fn from(inner: ParseErrorInner) -> Self {
        Self(inner)
    }
}

/// The envelope's MAC does not match its contents; it was forged or tampered with.
#[derive(Debug)]
pub struct IntegrityError(MacError);

impl Display for IntegrityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("cookie envelope failed verification")
    }
}

impl Error for IntegrityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

#[derive(Debug)]
pub enum DecryptError {
    Parse(ParseError),
    Integrity(IntegrityError),
    /// The MAC was valid but the plaintext padding was not, which only a key holder can produce.
    Unpadding(block_padding::UnpadError),
}

impl DecryptError {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Integrity(_) => "integrity",
            Self::Unpadding(_) => "unpadding",
        }
    }
}

impl Display for DecryptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("invalid cookie")
    }
}

impl Error for DecryptError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Integrity(e) => Some(e),
            Self::Unpadding(e) => Some(e),
        }
    }
}


use crate::base64_decode_array;
use crate::cookie_keys::CookieKeys;
use base64::display::Base64Display;
use cipher::BlockDecryptMut;
use cipher::BlockEncryptMut;
use crypto_common::KeyIvInit;
use digest::Mac;
use digest::MacError;
use hmac::Hmac;
use rand::CryptoRng;
use rand::Rng;
use sha2::Sha256;
use std::error::Error;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;
