/// Turns application values into the byte payload carried inside a cookie envelope.
///
/// For every value `v` an encoder accepts, `decode(encode(v))` must give back an equivalent
/// value.
pub trait Encoder<T> {
    fn encode(&self, value: &T) -> Result<Vec<u8>, EncodeError>;
    fn decode(&self, bytes: Vec<u8>) -> Result<T, DecodeError>;
}

/// Encodes any serde-compatible value as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl<T: Serialize + DeserializeOwned> Encoder<T> for JsonEncoder {
    fn encode(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        serde_json::to_vec(value).map_err(EncodeError::Json)
    }
    fn decode(&self, bytes: Vec<u8>) -> Result<T, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        serde_json::from_slice(&bytes).map_err(DecodeError::Json)
    }
}

/// Passes strings through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEncoder;

impl Encoder<String> for NullEncoder {
    fn encode(&self, value: &String) -> Result<Vec<u8>, EncodeError> {
        if value.is_empty() {
            return Err(EncodeError::Empty);
        }
        Ok(value.as_bytes().to_vec())
    }
    fn decode(&self, bytes: Vec<u8>) -> Result<String, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        String::from_utf8(bytes).map_err(DecodeError::Utf8)
    }
}

#[derive(Debug)]
pub enum EncodeError {
    /// The encoder cannot represent an empty value.
    Empty,
    Json(serde_json::Error),
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("cannot encode an empty value"),
            Self::Json(_) => f.write_str("failed to encode value as JSON"),
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Empty => None,
            Self::Json(e) => Some(e),
        }
    }
}

#[derive(Debug)]
pub enum DecodeError {
    Empty,
    Json(serde_json::Error),
    Utf8(FromUtf8Error),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("failed to decode cookie payload")
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Empty => None,
            Self::Json(e) => Some(e),
            Self::Utf8(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Visit {
        uid: u64,
        pages: Vec<String>,
        admin: Option<bool>,
    }

    #[test]
    fn json() {
        let visit = Visit {
            uid: 42,
            pages: vec!["/".to_owned(), "/inbox".to_owned()],
            admin: None,
        };
        let bytes = JsonEncoder.encode(&visit).unwrap();
        let decoded: Visit = JsonEncoder.decode(bytes).unwrap();
        assert_eq!(decoded, visit);

        let value = json!({ "uid": 42 });
        let bytes = JsonEncoder.encode(&value).unwrap();
        assert_eq!(bytes, br#"{"uid":42}"#);
    }

    #[test]
    fn json_rejects_bad_payloads() {
        assert!(matches!(
            <JsonEncoder as Encoder<Visit>>::decode(&JsonEncoder, Vec::new()),
            Err(DecodeError::Empty)
        ));
        assert!(matches!(
            <JsonEncoder as Encoder<Visit>>::decode(&JsonEncoder, b"{\"uid\":".to_vec()),
            Err(DecodeError::Json(_))
        ));
        assert!(matches!(
            <JsonEncoder as Encoder<Visit>>::decode(&JsonEncoder, b"{\"uid\":\"42\"}".to_vec()),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn null() {
        let bytes = NullEncoder.encode(&"ünïcode".to_owned()).unwrap();
        assert_eq!(NullEncoder.decode(bytes).unwrap(), "ünïcode");

        assert!(matches!(
            NullEncoder.encode(&String::new()),
            Err(EncodeError::Empty)
        ));
        assert!(matches!(
            NullEncoder.decode(Vec::new()),
            Err(DecodeError::Empty)
        ));
        assert!(matches!(
            NullEncoder.decode(vec![0xFF, 0xFE]),
            Err(DecodeError::Utf8(_))
        ));
    }

    use super::DecodeError;
    use super::EncodeError;
    use super::Encoder;
    use super::JsonEncoder;
    use super::NullEncoder;
    use serde::Deserialize;
    use serde::Serialize;
    use serde_json::json;
}

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::string::FromUtf8Error;
