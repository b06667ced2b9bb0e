//! Serde support for key types.
//! Human-readable formats (TOML, JSON) see base58 text, binary formats see raw bytes.

use core::fmt;
use core::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{PublicKey, Signature, Xprv};

impl Serialize for Xprv {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes()[..])
    }
}

impl<'de> Deserialize<'de> for Xprv {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BytesVisitor;

        impl<'de> Visitor<'de> for BytesVisitor {
            type Value = Xprv;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a valid 64-byte string")
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Xprv, E>
            where
                E: de::Error,
            {
                if v.len() == 64 {
                    Xprv::from_bytes(v).map_err(|_| de::Error::custom("decoding failed"))
                } else {
                    Err(de::Error::invalid_length(v.len(), &self))
                }
            }
        }

        deserializer.deserialize_bytes(BytesVisitor)
    }
}

/// Visitor accepting either base58 text or raw bytes of a fixed length.
struct Base58Visitor<T> {
    expecting: &'static str,
    from_bytes: fn(&[u8]) -> Option<T>,
}

impl<'de, T> Visitor<'de> for Base58Visitor<T> {
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.expecting)
    }

    fn visit_str<E>(self, v: &str) -> Result<T, E>
    where
        E: de::Error,
    {
        let bytes = bs58::decode(v)
            .into_vec()
            .map_err(|_| de::Error::invalid_value(de::Unexpected::Str(v), &self))?;
        self.visit_bytes(&bytes)
    }

    fn visit_bytes<E>(self, v: &[u8]) -> Result<T, E>
    where
        E: de::Error,
    {
        (self.from_bytes)(v).ok_or_else(|| de::Error::invalid_length(v.len(), &self))
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<T, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let mut bytes = Vec::new();
        while let Some(b) = seq.next_element::<u8>()? {
            bytes.push(b);
        }
        self.visit_bytes(&bytes)
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_base58())
        } else {
            serializer.serialize_bytes(self.as_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let visitor = Base58Visitor {
            expecting: "a 32-byte public key",
            from_bytes: |b| PublicKey::from_bytes(b).ok(),
        };
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(visitor)
        } else {
            deserializer.deserialize_bytes(visitor)
        }
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            serializer.serialize_str(&bs58::encode(&self.0[..]).into_string())
        } else {
            serializer.serialize_bytes(&self.0[..])
        }
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let visitor = Base58Visitor {
            expecting: "a 64-byte signature",
            from_bytes: |b| Signature::from_bytes(b).ok(),
        };
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(visitor)
        } else {
            deserializer.deserialize_bytes(visitor)
        }
    }
}

impl FromStr for Signature {
    type Err = super::KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|_| super::KeyError::InvalidEncoding)?;
        Signature::from_bytes(&bytes)
    }
}
