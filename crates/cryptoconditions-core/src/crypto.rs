//! Cryptographic primitives consumed by conditions and fulfillments.
//!
//! Wraps SHA-256 hashing, Ed25519 signing and RSA-PSS (SHA-256, MGF1-SHA-256,
//! 32-byte salt) with strong types. Key generation lives here only so callers
//! and tests can produce signatures; conditions never hold private keys.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pss;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::VerifyError;
use crate::types::Fingerprint;
use crate::uint::strip_leading_zeros;

/// Public exponent fixed for RSA-SHA-256 conditions.
pub const RSA_PUBLIC_EXPONENT: u32 = 65537;

/// Compute the SHA-256 fingerprint of the given contents.
pub fn sha256(data: &[u8]) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(data);
    Fingerprint(hasher.finalize().into())
}

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify a signature over a message.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not verify,
    /// and an error if the key is not a valid curve point.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<bool, VerifyError> {
        let verifying_key =
            VerifyingKey::from_bytes(&self.0).map_err(|_| VerifyError::InvalidPublicKey)?;
        let sig = Signature::from_bytes(&signature.0);
        Ok(verifying_key.verify(message, &sig).is_ok())
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Ed25519PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Ed25519PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature(pub [u8; 64]);

impl Ed25519Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Sig({}...)", &self.to_hex()[..16])
    }
}

impl AsRef<[u8]> for Ed25519Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 64]> for Ed25519Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

/// An Ed25519 keypair for producing fulfillment signatures.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        let sig = self.signing_key.sign(message);
        Ed25519Signature(sig.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}

/// An RSA keypair for producing RSA-PSS fulfillment signatures.
#[derive(Clone)]
pub struct RsaKeypair {
    private_key: RsaPrivateKey,
}

impl RsaKeypair {
    /// Generate a new random keypair with public exponent 65537.
    pub fn generate(bits: usize) -> Result<Self, rsa::Error> {
        let mut rng = rand::thread_rng();
        let exponent = BigUint::from(RSA_PUBLIC_EXPONENT);
        let private_key = RsaPrivateKey::new_with_exp(&mut rng, bits, &exponent)?;
        Ok(Self { private_key })
    }

    /// Load a PKCS#1 PEM-encoded private key.
    pub fn from_pkcs1_pem(pem: &str) -> Result<Self, rsa::pkcs1::Error> {
        let private_key = RsaPrivateKey::from_pkcs1_pem(pem)?;
        Ok(Self { private_key })
    }

    /// The public modulus as minimal unsigned big-endian bytes.
    pub fn modulus(&self) -> Vec<u8> {
        self.private_key.n().to_bytes_be()
    }

    /// Sign a message with RSA-PSS / SHA-256.
    ///
    /// The signature is left-padded to the modulus length.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signing_key = pss::BlindedSigningKey::<Sha256>::new(self.private_key.clone());
        let mut rng = rand::thread_rng();
        let signature = signing_key.sign_with_rng(&mut rng, message).to_vec();
        let size = self.private_key.size();
        if signature.len() >= size {
            return signature;
        }
        let mut padded = vec![0u8; size - signature.len()];
        padded.extend_from_slice(&signature);
        padded
    }
}

impl fmt::Debug for RsaKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RsaKeypair({} bits)", self.private_key.size() * 8)
    }
}

/// Verify an RSA-PSS / SHA-256 signature against a bare modulus.
///
/// Returns `Ok(false)` for a signature that does not verify, and an error if
/// the modulus cannot form a public key.
pub fn rsa_pss_verify(modulus: &[u8], message: &[u8], signature: &[u8]) -> Result<bool, VerifyError> {
    let n = BigUint::from_bytes_be(strip_leading_zeros(modulus));
    let e = BigUint::from(RSA_PUBLIC_EXPONENT);
    let public_key =
        RsaPublicKey::new(n, e).map_err(|e| VerifyError::InvalidRsaKey(e.to_string()))?;
    let verifying_key = pss::VerifyingKey::<Sha256>::new(public_key);
    let signature = match pss::Signature::try_from(signature) {
        Ok(sig) => sig,
        Err(_) => return Ok(false),
    };
    Ok(rsa::signature::Verifier::verify(&verifying_key, message, &signature).is_ok())
}
