use base64::Engine;
use serde::{Deserialize, Deserializer, Serializer};

pub fn encode<T: AsRef<[u8]>>(bytes: T) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

pub fn decode<S: AsRef<str>>(text: S) -> Result<Vec<u8>, base64::DecodeError> {
    base64::engine::general_purpose::STANDARD.decode(text.as_ref())
}

// Adapted from https://gist.github.com/silmeth/62a92e155d72bb9c5f19c8cdf4c8993e
pub fn as_base64<T: AsRef<[u8]>, S: Serializer>(val: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&encode(val))
}

// Adapted from https://gist.github.com/silmeth/62a92e155d72bb9c5f19c8cdf4c8993e
pub fn from_base64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    use serde::de;

    String::deserialize(deserializer).and_then(|s| {
        decode(&s).map_err(|e| de::Error::custom(format!("invalid base64 string: {}, {}", s, e)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let bytes = b"shoal".to_vec();
        assert_eq!(decode(encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode("not!!base64??").is_err());
    }
}
