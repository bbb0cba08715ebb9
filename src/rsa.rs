//! Textbook RSA over `BigUint`.
//!
//! No padding: this is the arithmetic the menu demonstrates, not a
//! production cipher. Keys serialize with decimal strings so JSON output
//! stays readable and lossless.

use num::bigint::{BigInt, BigUint, Sign};
use num::Zero;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::numtheory::{lcm, mod_inverse, random_prime};

/// Public exponent used for every generated key.
pub const PUBLIC_EXPONENT: u32 = 65_537;

/// Smallest modulus size accepted by [`KeyPair::generate`].
pub const MIN_BITS: u64 = 32;

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    #[serde(with = "decimal")]
    pub n: BigUint,
    #[serde(with = "decimal")]
    pub e: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    #[serde(with = "decimal")]
    pub n: BigUint,
    #[serde(with = "decimal")]
    pub d: BigUint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RsaError {
    #[error("key size must be at least {min} bits, got {0}", min = MIN_BITS)]
    KeyTooSmall(u64),

    #[error("message is not smaller than the modulus")]
    MessageTooLarge,

    #[error("ciphertext is not smaller than the modulus")]
    CiphertextTooLarge,

    #[error("decrypted value is not valid UTF-8 text")]
    NotText,
}

// ============================================================================
// KEY GENERATION
// ============================================================================

impl KeyPair {
    /// Generate a key pair whose modulus has `bits` bits.
    ///
    /// # Errors
    /// Returns [`RsaError::KeyTooSmall`] below [`MIN_BITS`].
    pub fn generate(bits: u64) -> Result<KeyPair, RsaError> {
        if bits < MIN_BITS {
            return Err(RsaError::KeyTooSmall(bits));
        }
        let e = BigUint::from(PUBLIC_EXPONENT);
        let p_bits = bits / 2;
        let q_bits = bits - p_bits;

        loop {
            let (Some(p), Some(q)) = (random_prime(p_bits), random_prime(q_bits)) else {
                return Err(RsaError::KeyTooSmall(bits));
            };
            if p == q {
                continue;
            }
            let n = &p * &q;
            if n.bits() != bits {
                continue;
            }
            // Carmichael's totient: lcm(p - 1, q - 1).
            let lambda = lcm(&to_signed(&(p - 1u32)), &to_signed(&(q - 1u32)));
            let Some(d) = mod_inverse(&to_signed(&e), &lambda) else {
                continue;
            };
            let Some(d) = d.to_biguint() else {
                continue;
            };
            return Ok(KeyPair {
                public: PublicKey { n: n.clone(), e: e.clone() },
                private: PrivateKey { n, d },
            });
        }
    }

    /// Whether `d` inverts `e` for this modulus on a sample value.
    pub fn is_consistent(&self) -> bool {
        let sample = BigUint::from(42u32) % &self.public.n;
        let Ok(c) = encrypt(&sample, &self.public) else {
            return false;
        };
        decrypt(&c, &self.private).is_ok_and(|m| m == sample)
    }
}

fn to_signed(n: &BigUint) -> BigInt {
    BigInt::from_biguint(Sign::Plus, n.clone())
}

// ============================================================================
// ENCRYPTION
// ============================================================================

/// `m^e mod n`.
///
/// # Errors
/// Returns [`RsaError::MessageTooLarge`] when `m >= n`.
pub fn encrypt(m: &BigUint, key: &PublicKey) -> Result<BigUint, RsaError> {
    if *m >= key.n {
        return Err(RsaError::MessageTooLarge);
    }
    Ok(m.modpow(&key.e, &key.n))
}

/// `c^d mod n`.
///
/// # Errors
/// Returns [`RsaError::CiphertextTooLarge`] when `c >= n`.
pub fn decrypt(c: &BigUint, key: &PrivateKey) -> Result<BigUint, RsaError> {
    if *c >= key.n {
        return Err(RsaError::CiphertextTooLarge);
    }
    Ok(c.modpow(&key.d, &key.n))
}

/// Encode text as a big-endian integer.
pub fn text_to_int(text: &str) -> BigUint {
    BigUint::from_bytes_be(text.as_bytes())
}

/// Decode a big-endian integer back to text.
///
/// # Errors
/// Returns [`RsaError::NotText`] when the bytes are not UTF-8.
pub fn int_to_text(n: &BigUint) -> Result<String, RsaError> {
    if n.is_zero() {
        return Ok(String::new());
    }
    String::from_utf8(n.to_bytes_be()).map_err(|_| RsaError::NotText)
}

/// Encrypt a text message with a public key.
///
/// # Errors
/// Returns [`RsaError::MessageTooLarge`] when the encoded text does not fit
/// under the modulus.
pub fn encrypt_text(text: &str, key: &PublicKey) -> Result<BigUint, RsaError> {
    encrypt(&text_to_int(text), key)
}

// ============================================================================
// SERDE
// ============================================================================

mod decimal {
    use num::bigint::BigUint;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(n: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&n.to_str_radix(10))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
        let s = String::deserialize(deserializer)?;
        BigUint::parse_bytes(s.as_bytes(), 10)
            .ok_or_else(|| serde::de::Error::custom(format!("not a decimal integer: {s}")))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook_pair() -> KeyPair {
        // p = 61, q = 53
        KeyPair {
            public: PublicKey {
                n: BigUint::from(3233u32),
                e: BigUint::from(17u32),
            },
            private: PrivateKey {
                n: BigUint::from(3233u32),
                d: BigUint::from(2753u32),
            },
        }
    }

    #[test]
    fn textbook_vector() {
        let pair = textbook_pair();
        let c = encrypt(&BigUint::from(65u32), &pair.public).unwrap();
        assert_eq!(c, BigUint::from(2790u32));
        assert_eq!(decrypt(&c, &pair.private).unwrap(), BigUint::from(65u32));
    }

    #[test]
    fn message_must_be_below_modulus() {
        let pair = textbook_pair();
        let err = encrypt(&BigUint::from(3233u32), &pair.public).unwrap_err();
        assert_eq!(err, RsaError::MessageTooLarge);
    }

    #[test]
    fn generated_key_has_requested_size_and_works() {
        let pair = KeyPair::generate(128).unwrap();
        assert_eq!(pair.public.n.bits(), 128);
        assert_eq!(pair.public.e, BigUint::from(PUBLIC_EXPONENT));
        assert!(pair.is_consistent());
    }

    #[test]
    fn text_survives_encrypt_decrypt() {
        let pair = KeyPair::generate(256).unwrap();
        let c = encrypt_text("hello, rsa", &pair.public).unwrap();
        assert_eq!(int_to_text(&decrypt(&c, &pair.private).unwrap()).unwrap(), "hello, rsa");
    }

    #[test]
    fn long_text_does_not_fit_small_key() {
        let pair = KeyPair::generate(64).unwrap();
        let err = encrypt_text("far too long for sixty-four bits", &pair.public).unwrap_err();
        assert_eq!(err, RsaError::MessageTooLarge);
    }

    #[test]
    fn tiny_key_sizes_rejected() {
        assert_eq!(KeyPair::generate(16).unwrap_err(), RsaError::KeyTooSmall(16));
    }

    #[test]
    fn keys_serialize_as_decimal_strings() {
        let pair = textbook_pair();
        let json = serde_json::to_value(&pair).unwrap();
        assert_eq!(json["public"]["n"], "3233");
        assert_eq!(json["private"]["d"], "2753");

        let back: KeyPair = serde_json::from_value(json).unwrap();
        assert_eq!(back, pair);
    }

    #[test]
    fn empty_text_maps_to_zero() {
        assert_eq!(text_to_int(""), BigUint::from(0u32));
        assert_eq!(int_to_text(&BigUint::from(0u32)).unwrap(), "");
    }
}
