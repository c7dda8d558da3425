//! User identifiers and signing credentials.
//!
//! A blog is addressed by its ed25519 public key (`UserId`), items are
//! addressed by the ed25519 signature over their serialized bytes
//! (`Signature`), and the `Password` is the base58check-encoded 32-byte seed
//! of the signing key. All three cross the string/binary boundary in base58,
//! matching the server's URL and config encoding.

pub mod error;

pub use error::IdentityError;

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};

pub const USER_ID_BYTES: usize = 32;
pub const SIGNATURE_BYTES: usize = 64;
const SEED_BYTES: usize = 32;

/// Public identifier of a content stream: an ed25519 public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId {
    bytes: [u8; USER_ID_BYTES],
    string: String,
}

impl UserId {
    /// Decode from the canonical base58 string form.
    pub fn from_string(value: &str) -> Result<Self, IdentityError> {
        let decoded = bs58::decode(value)
            .into_vec()
            .map_err(|source| IdentityError::Decode {
                what: "user_id",
                source,
            })?;
        let bytes: [u8; USER_ID_BYTES] =
            decoded
                .as_slice()
                .try_into()
                .map_err(|_| IdentityError::WrongLength {
                    what: "user_id",
                    expected: USER_ID_BYTES,
                    actual: decoded.len(),
                })?;
        Ok(Self {
            bytes,
            string: value.to_string(),
        })
    }

    pub fn as_bytes(&self) -> &[u8; USER_ID_BYTES] {
        &self.bytes
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.string)
    }
}

/// Detached ed25519 signature over an item's serialized bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; SIGNATURE_BYTES],
    string: String,
}

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self {
            string: bs58::encode(bytes).into_string(),
            bytes,
        }
    }

    /// Decode from the base58 string form. Rarely needed; items are normally
    /// signed locally rather than reconstructed from their address.
    pub fn from_string(value: &str) -> Result<Self, IdentityError> {
        let decoded = bs58::decode(value)
            .into_vec()
            .map_err(|source| IdentityError::Decode {
                what: "signature",
                source,
            })?;
        let bytes: [u8; SIGNATURE_BYTES] =
            decoded
                .as_slice()
                .try_into()
                .map_err(|_| IdentityError::WrongLength {
                    what: "signature",
                    expected: SIGNATURE_BYTES,
                    actual: decoded.len(),
                })?;
        Ok(Self {
            bytes,
            string: value.to_string(),
        })
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_BYTES] {
        &self.bytes
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.string)
    }
}

/// Private signing credential for one stream.
///
/// Loaded once per feed from configuration, never persisted. Callers must
/// verify [`Password::matches_user`] before publishing under a `UserId`.
pub struct Password {
    signing_key: SigningKey,
}

impl Password {
    /// Decode from the base58check string form (a 32-byte ed25519 seed).
    pub fn from_string(value: &str) -> Result<Self, IdentityError> {
        let decoded = bs58::decode(value)
            .with_check(None)
            .into_vec()
            .map_err(|source| IdentityError::Decode {
                what: "password",
                source,
            })?;
        let seed: [u8; SEED_BYTES] =
            decoded
                .as_slice()
                .try_into()
                .map_err(|_| IdentityError::WrongLength {
                    what: "password",
                    expected: SEED_BYTES,
                    actual: decoded.len(),
                })?;
        Ok(Self {
            signing_key: SigningKey::from_bytes(&seed),
        })
    }

    /// Whether this credential's public key is `user_id`.
    pub fn matches_user(&self, user_id: &UserId) -> bool {
        let verifying: VerifyingKey = self.signing_key.verifying_key();
        verifying.to_bytes() == *user_id.as_bytes()
    }

    pub fn sign(&self, data: &[u8]) -> Signature {
        Signature::from_bytes(self.signing_key.sign(data).to_bytes())
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::Verifier;

    const SEED: [u8; 32] = [7; 32];

    /// Matching (user_id, password) strings derived from a fixed seed.
    fn test_credentials() -> (String, String) {
        let key = SigningKey::from_bytes(&SEED);
        let user_id = bs58::encode(key.verifying_key().to_bytes()).into_string();
        let password = bs58::encode(SEED).with_check().into_string();
        (user_id, password)
    }

    #[test]
    fn test_user_id_roundtrip() {
        let (user_id, _) = test_credentials();
        let decoded = UserId::from_string(&user_id).unwrap();
        assert_eq!(decoded.to_string(), user_id);
        assert_eq!(decoded.as_bytes().len(), USER_ID_BYTES);
    }

    #[test]
    fn test_user_id_rejects_bad_alphabet() {
        // '0' is not in the base58 alphabet.
        assert!(matches!(
            UserId::from_string("0OIl"),
            Err(IdentityError::Decode { .. })
        ));
    }

    #[test]
    fn test_user_id_rejects_wrong_length() {
        let short = bs58::encode([1u8; 16]).into_string();
        assert!(matches!(
            UserId::from_string(&short),
            Err(IdentityError::WrongLength {
                expected: 32,
                actual: 16,
                ..
            })
        ));
    }

    #[test]
    fn test_signature_roundtrip() {
        let sig = Signature::from_bytes([9; 64]);
        let reparsed = Signature::from_string(&sig.to_string()).unwrap();
        assert_eq!(reparsed, sig);
    }

    #[test]
    fn test_password_rejects_bad_checksum() {
        // Plain base58 of a seed is not a valid base58check string.
        let plain = bs58::encode([7u8; 32]).into_string();
        assert!(matches!(
            Password::from_string(&plain),
            Err(IdentityError::Decode { .. })
        ));
    }

    #[test]
    fn test_password_matches_its_user() {
        let (user_id, password) = test_credentials();
        let user_id = UserId::from_string(&user_id).unwrap();
        let password = Password::from_string(&password).unwrap();
        assert!(password.matches_user(&user_id));
    }

    #[test]
    fn test_password_rejects_other_user() {
        let (_, password) = test_credentials();
        let password = Password::from_string(&password).unwrap();

        let other_key = SigningKey::from_bytes(&[8; 32]);
        let other = bs58::encode(other_key.verifying_key().to_bytes()).into_string();
        let other = UserId::from_string(&other).unwrap();
        assert!(!password.matches_user(&other));
    }

    #[test]
    fn test_sign_verifies_under_public_key() {
        let (user_id, password) = test_credentials();
        let user_id = UserId::from_string(&user_id).unwrap();
        let password = Password::from_string(&password).unwrap();

        let payload = b"item bytes";
        let sig = password.sign(payload);

        let verifying = VerifyingKey::from_bytes(user_id.as_bytes()).unwrap();
        let dalek_sig = ed25519_dalek::Signature::from_bytes(sig.as_bytes());
        assert!(verifying.verify(payload, &dalek_sig).is_ok());
    }
}
