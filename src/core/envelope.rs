//! Authenticated encryption envelope.
//!
//! AES-256-GCM with a fresh 96-bit IV per seal and a 128-bit tag. The
//! wire form is self-describing: base64 fields joined by `:`. An
//! [`Envelope`] carries `iv:tag:ciphertext`; a [`Payload`] prepends the
//! key-derivation salt (`salt:iv:tag:ciphertext`) so any device that
//! knows only the passphrase can decrypt what it fetches.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::core::constants::{FIELD_DELIMITER, IV_LEN, SALT_LEN, TAG_LEN};
use crate::core::kdf::{DerivedKey, Salt};
use crate::error::{CryptoError, Result};

/// Sealed ciphertext with its IV and detached authentication tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    iv: [u8; IV_LEN],
    tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serialize as `iv:tag:ciphertext` (base64 fields).
    pub fn encode(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            BASE64.encode(self.iv),
            BASE64.encode(self.tag),
            BASE64.encode(&self.ciphertext),
            sep = FIELD_DELIMITER,
        )
    }

    /// Parse the three-field wire form.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if the string does not split into
    /// exactly three fields or any field is not valid base64 of the
    /// expected length.
    pub fn parse(encoded: &str) -> Result<Self> {
        let fields: Vec<&str> = encoded.split(FIELD_DELIMITER).collect();
        if fields.len() != 3 {
            return Err(CryptoError::Format(format!(
                "expected 3 fields, found {}",
                fields.len()
            ))
            .into());
        }

        let iv = decode_fixed::<IV_LEN>(fields[0], "iv")?;
        let tag = decode_fixed::<TAG_LEN>(fields[1], "tag")?;
        let ciphertext = BASE64
            .decode(fields[2])
            .map_err(|e| CryptoError::Format(format!("ciphertext: {}", e)))?;

        Ok(Self {
            iv,
            tag,
            ciphertext,
        })
    }
}

/// Seal plaintext under a derived key.
///
/// Generates a fresh random IV per call — sealing the same plaintext
/// twice never produces the same envelope.
///
/// # Errors
///
/// Returns `CryptoError::Encrypt` if the cipher fails.
pub fn seal(plaintext: &[u8], key: &DerivedKey) -> Result<Envelope> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);
    let nonce = Nonce::from(iv);

    // aes-gcm appends the tag to the ciphertext; split it back out so
    // the wire form carries the tag as its own field.
    let mut sealed = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| CryptoError::Encrypt(e.to_string()))?;

    if sealed.len() < TAG_LEN {
        return Err(CryptoError::Encrypt("missing authentication tag".to_string()).into());
    }
    let tag_start = sealed.len() - TAG_LEN;
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&sealed[tag_start..]);
    sealed.truncate(tag_start);

    Ok(Envelope {
        iv,
        tag,
        ciphertext: sealed,
    })
}

/// Open an envelope under a derived key.
///
/// # Errors
///
/// Returns `CryptoError::AuthenticationFailed` if tag verification
/// fails — wrong key or tampering. Corrupted plaintext is never
/// returned.
pub fn open(envelope: &Envelope, key: &DerivedKey) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());
    let nonce = Nonce::from(envelope.iv);

    let mut sealed = envelope.ciphertext.clone();
    sealed.extend_from_slice(&envelope.tag);

    let plaintext = cipher
        .decrypt(&nonce, sealed.as_slice())
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    Ok(Zeroizing::new(plaintext))
}

/// A remote payload: the key-derivation salt plus a sealed envelope.
///
/// The salt lives beside — not inside — the envelope, carried by the
/// storage layer with every payload rather than with the keyring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    salt: Salt,
    envelope: Envelope,
}

impl Payload {
    /// Assemble a payload from a salt and sealed envelope.
    pub fn new(salt: Salt, envelope: Envelope) -> Self {
        Self { salt, envelope }
    }

    /// The key-derivation salt this payload was sealed under.
    pub fn salt(&self) -> Salt {
        self.salt
    }

    /// The sealed envelope.
    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Serialize as `salt:iv:tag:ciphertext` (base64 fields).
    pub fn encode(&self) -> String {
        format!(
            "{}{}{}",
            BASE64.encode(self.salt),
            FIELD_DELIMITER,
            self.envelope.encode()
        )
    }

    /// Parse the four-field wire form.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if the string does not carry a
    /// salt followed by a valid envelope.
    pub fn parse(encoded: &str) -> Result<Self> {
        let (salt_field, rest) = encoded
            .split_once(FIELD_DELIMITER)
            .ok_or_else(|| CryptoError::Format("expected 4 fields, found 1".to_string()))?;

        let salt = decode_fixed::<SALT_LEN>(salt_field, "salt")?;
        let envelope = Envelope::parse(rest)?;

        Ok(Self { salt, envelope })
    }
}

fn decode_fixed<const N: usize>(field: &str, name: &str) -> Result<[u8; N]> {
    let bytes = BASE64
        .decode(field)
        .map_err(|e| CryptoError::Format(format!("{}: {}", name, e)))?;

    bytes.as_slice().try_into().map_err(|_| {
        CryptoError::Format(format!(
            "{}: expected {} bytes, found {}",
            name,
            N,
            bytes.len()
        ))
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::kdf;
    use crate::error::Error;

    fn test_key() -> DerivedKey {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        DerivedKey::from_bytes(bytes)
    }

    fn assert_auth_failed(result: Result<Zeroizing<Vec<u8>>>) {
        match result {
            Err(Error::Crypto(CryptoError::AuthenticationFailed)) => {}
            other => panic!("expected AuthenticationFailed, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let key = test_key();
        let plaintext = b"DATABASE_URL=postgres://localhost/app\nAPI_KEY=abc123\n";

        let envelope = seal(plaintext, &key).unwrap();
        let opened = open(&envelope, &key).unwrap();

        assert_eq!(opened.as_slice(), plaintext);
    }

    #[test]
    fn test_seal_is_non_deterministic() {
        let key = test_key();

        let env1 = seal(b"same bytes", &key).unwrap();
        let env2 = seal(b"same bytes", &key).unwrap();

        assert_ne!(env1.iv, env2.iv);
        assert_ne!(env1.ciphertext, env2.ciphertext);
    }

    #[test]
    fn test_open_with_wrong_key_fails() {
        let envelope = seal(b"secret", &test_key()).unwrap();

        assert_auth_failed(open(&envelope, &test_key()));
    }

    #[test]
    fn test_tampered_ciphertext_detected() {
        let key = test_key();
        let mut envelope = seal(b"secret material", &key).unwrap();

        for i in 0..envelope.ciphertext.len() {
            envelope.ciphertext[i] ^= 0x01;
            assert_auth_failed(open(&envelope, &key));
            envelope.ciphertext[i] ^= 0x01;
        }
    }

    #[test]
    fn test_tampered_tag_detected() {
        let key = test_key();
        let mut envelope = seal(b"secret material", &key).unwrap();

        envelope.tag[0] ^= 0xFF;

        assert_auth_failed(open(&envelope, &key));
    }

    #[test]
    fn test_envelope_encode_parse_roundtrip() {
        let key = test_key();
        let envelope = seal(b"payload bytes", &key).unwrap();

        let parsed = Envelope::parse(&envelope.encode()).unwrap();

        assert_eq!(parsed, envelope);
        assert_eq!(open(&parsed, &key).unwrap().as_slice(), b"payload bytes");
    }

    #[test]
    fn test_envelope_parse_rejects_missing_fields() {
        let result = Envelope::parse("onlyonefield");
        assert!(matches!(
            result,
            Err(Error::Crypto(CryptoError::Format(_)))
        ));

        let result = Envelope::parse("two:fields");
        assert!(matches!(
            result,
            Err(Error::Crypto(CryptoError::Format(_)))
        ));
    }

    #[test]
    fn test_envelope_parse_rejects_bad_base64() {
        let result = Envelope::parse("not base64!:also bad!:nope!");
        assert!(matches!(
            result,
            Err(Error::Crypto(CryptoError::Format(_)))
        ));
    }

    #[test]
    fn test_envelope_parse_rejects_wrong_iv_length() {
        let short_iv = BASE64.encode([0u8; 4]);
        let tag = BASE64.encode([0u8; TAG_LEN]);
        let ct = BASE64.encode(b"ct");

        let result = Envelope::parse(&format!("{}:{}:{}", short_iv, tag, ct));
        assert!(matches!(
            result,
            Err(Error::Crypto(CryptoError::Format(_)))
        ));
    }

    #[test]
    fn test_payload_carries_salt() {
        let (key, salt) = kdf::derive("a shared passphrase", None);
        let envelope = seal(b"KEY=value\n", &key).unwrap();
        let payload = Payload::new(salt, envelope);

        let parsed = Payload::parse(&payload.encode()).unwrap();
        assert_eq!(parsed.salt(), salt);

        // A device that only knows the passphrase can re-derive and open.
        let (rederived, _) = kdf::derive("a shared passphrase", Some(parsed.salt()));
        let opened = open(parsed.envelope(), &rederived).unwrap();
        assert_eq!(opened.as_slice(), b"KEY=value\n");
    }

    #[test]
    fn test_payload_parse_rejects_truncated_form() {
        assert!(Payload::parse("justsalt").is_err());
        assert!(Payload::parse("").is_err());
    }
}
