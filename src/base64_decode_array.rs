/// Decodes unpadded URL-safe base 64 that must contain exactly `N` bytes.
pub(crate) fn base64_decode_array<const N: usize>(source: &str) -> Result<[u8; N], Error> {
    assert_ne!(N, 0);
    if source.len() != (N * 4 + 2) / 3 {
        return Err(Error::WrongSize(WrongSize));
    }

    let mut buf = [0; N];
    let bytes = base64::decode_config_slice(source, base64::URL_SAFE_NO_PAD, &mut buf)
        .map_err(Error::InvalidBase64)?;
    if bytes != N {
        return Err(Error::WrongSize(WrongSize));
    }

    Ok(buf)
}

#[derive(Debug)]
pub(crate) enum Error {
    InvalidBase64(base64::DecodeError),
    WrongSize(WrongSize),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("failed to decode fixed-size base 64")
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBase64(e) => Some(e),
            Self::WrongSize(e) => Some(e),
        }
    }
}

#[derive(Debug)]
pub(crate) struct WrongSize;

impl Display for WrongSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("input data was wrong size")
    }
}

impl std::error::Error for WrongSize {}

#[test]
fn test_decode() {
    let iv = [7; 16];
    let encoded = base64::encode_config(iv, base64::URL_SAFE_NO_PAD);
    assert_eq!(base64_decode_array::<16>(&encoded).unwrap(), iv);

    assert!(matches!(
        base64_decode_array::<16>(&encoded[1..]),
        Err(Error::WrongSize(_))
    ));
    assert!(matches!(
        base64_decode_array::<32>(&encoded),
        Err(Error::WrongSize(_))
    ));
    let mut bad = encoded.into_bytes();
    bad[3] = b'+';
    assert!(matches!(
        base64_decode_array::<16>(std::str::from_utf8(&bad).unwrap()),
        Err(Error::InvalidBase64(_))
    ));
}

use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
