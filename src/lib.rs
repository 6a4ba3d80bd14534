//! Tamper-proof, confidential cookies and the cookie-backed sessions built on them.
//!
//! A cookie value is encrypted with AES-256-CBC and authenticated with HMAC-SHA256 under keys
//! stretched from a single master secret, so the client can hold state it can neither read nor
//! forge.
#![warn(
    clippy::pedantic,
    noop_method_call,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_op_in_unsafe_fn,
    unused_lifetimes,
    unused_qualifications
)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

pub use master_secret::MasterSecret;
mod master_secret;

pub use key_derivation::derive;
pub use key_derivation::DerivedKey;
pub use key_derivation::KeyCache;
pub use key_derivation::KeyGenerator;
mod key_derivation;

mod cookie_keys;

pub use envelope::DecryptError;
pub use envelope::IntegrityError;
pub use envelope::ParseError;
mod envelope;

pub use encryptor::AuthenticatedEncryptor;
mod encryptor;

pub use cookie_encryptor::Absent;
pub use cookie_encryptor::CookieEncryptor;
pub use cookie_encryptor::RevealError;
mod cookie_encryptor;

pub use encoder::DecodeError;
pub use encoder::EncodeError;
pub use encoder::Encoder;
pub use encoder::JsonEncoder;
pub use encoder::NullEncoder;
mod encoder;

pub use exchange::CookieRequest;
pub use exchange::CookieResponse;
mod exchange;

pub use options::CookieOptions;
mod options;

pub use store::GetError;
pub use store::NotFound;
pub use store::SecureCookieStore;
pub use store::SetError;
pub use store::TooLarge;
pub use store::MAX_COOKIE_LEN;
mod store;

pub use session::AttributePolicy;
pub use session::CurrentError;
pub use session::HostPolicy;
pub use session::Session;
pub use session::SessionManager;
pub use session::SessionState;
pub use session::ValidationError;
pub mod session;

pub use config::Config;
pub use config::ConfigError;
pub use config::MaxAge;
pub use config::SameSitePolicy;
pub use config::Secret;
pub mod config;

use base64_decode_array::base64_decode_array;
mod base64_decode_array;

#[cfg(test)]
mod captured_logs;

pub use cookie;
pub use http;
