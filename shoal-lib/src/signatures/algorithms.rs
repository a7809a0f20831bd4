use std::{fs::File, path::Path};

use blake2::{Blake2b512, Digest};
use ed25519_dalek::{
    pkcs8::{DecodePrivateKey, DecodePublicKey},
    Signature,
};
use log::warn;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use sha2::Sha512;
use sha3::Sha3_512;
use strum::{Display, EnumString};

use super::tagged_signature::TaggedSignature;
use crate::error::InvalidSignature;

/// Ed25519ph paired with the prehash digest used over the signed bytes.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Hash, EnumString, Display,
)]
pub enum SignatureAlgorithm {
    #[default]
    Ed25519phBlake2b512,
    Ed25519phSha2512,
    Ed25519phSha3512,
}

static PREHASH_CHUNK: usize = 512 * 1024;

fn prehash<D: Digest>(bytes: &[u8]) -> D {
    let mut hasher = D::new();
    bytes
        .chunks(PREHASH_CHUNK)
        .for_each(|chunk| hasher.update(chunk));
    hasher
}

/// Signs file metadata on the publishing side.
#[derive(Clone, Debug)]
pub struct MetadataSigner {
    algorithm: SignatureAlgorithm,
    key: ed25519_dalek::SigningKey,
}

impl MetadataSigner {
    pub fn new(algorithm: SignatureAlgorithm, key: ed25519_dalek::SigningKey) -> Self {
        Self { algorithm, key }
    }

    pub fn generate(algorithm: SignatureAlgorithm) -> Self {
        let mut rng = rand::rngs::OsRng;
        Self {
            algorithm,
            key: ed25519_dalek::SigningKey::generate(&mut rng),
        }
    }

    pub fn from_pkcs8_pem(
        algorithm: SignatureAlgorithm,
        pem: &str,
    ) -> Result<Self, InvalidSignature> {
        let key = ed25519_dalek::SigningKey::from_pkcs8_pem(pem)
            .map_err(|e| InvalidSignature::with_message_and_cause("malformed signing key", e))?;
        Ok(Self { algorithm, key })
    }

    /// The verifier half matching this signer.
    pub fn verifier(&self) -> MetadataVerifier {
        MetadataVerifier {
            algorithm: self.algorithm,
            key: self.key.verifying_key(),
        }
    }

    pub fn sign_file<P: AsRef<Path>>(&self, path: P) -> Result<TaggedSignature, InvalidSignature> {
        let file = File::open(path.as_ref()).map_err(InvalidSignature::with_cause)?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(InvalidSignature::with_cause)?;
        self.sign(&mmap[..])
    }

    pub fn sign<B: AsRef<[u8]>>(&self, bytes: B) -> Result<TaggedSignature, InvalidSignature> {
        let bytes = bytes.as_ref();
        let signature = match self.algorithm {
            SignatureAlgorithm::Ed25519phBlake2b512 => {
                self.key.sign_prehashed(prehash::<Blake2b512>(bytes), None)
            }
            SignatureAlgorithm::Ed25519phSha2512 => {
                self.key.sign_prehashed(prehash::<Sha512>(bytes), None)
            }
            SignatureAlgorithm::Ed25519phSha3512 => {
                self.key.sign_prehashed(prehash::<Sha3_512>(bytes), None)
            }
        }
        .map_err(|e| InvalidSignature::with_message_and_cause("signing failed", e))?;

        Ok(TaggedSignature {
            algorithm: self.algorithm,
            signature: signature.to_bytes().to_vec(),
        })
    }
}

/// Checks metadata signatures on the receiving side.
///
/// Verification is deterministic; a failure means the (data, signature,
/// key) triple is invalid and must be rejected, not retried.
#[derive(Clone, Debug)]
pub struct MetadataVerifier {
    algorithm: SignatureAlgorithm,
    key: ed25519_dalek::VerifyingKey,
}

impl MetadataVerifier {
    pub fn new(algorithm: SignatureAlgorithm, key: ed25519_dalek::VerifyingKey) -> Self {
        Self { algorithm, key }
    }

    pub fn from_public_key_pem(
        algorithm: SignatureAlgorithm,
        pem: &str,
    ) -> Result<Self, InvalidSignature> {
        let key = ed25519_dalek::VerifyingKey::from_public_key_pem(pem)
            .map_err(|e| InvalidSignature::with_message_and_cause("malformed verifying key", e))?;
        Ok(Self { algorithm, key })
    }

    pub fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    pub fn verify_file<P: AsRef<Path>>(
        &self,
        path: P,
        signature: &TaggedSignature,
    ) -> Result<(), InvalidSignature> {
        let file = File::open(path.as_ref()).map_err(InvalidSignature::with_cause)?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(InvalidSignature::with_cause)?;
        self.verify(&mmap[..], signature)
    }

    pub fn verify<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        signature: &TaggedSignature,
    ) -> Result<(), InvalidSignature> {
        if signature.algorithm != self.algorithm {
            return Err(InvalidSignature::with_message(format!(
                "signature algorithm {} does not match verifier algorithm {}",
                signature.algorithm, self.algorithm
            )));
        }
        let decoded = Signature::from_slice(&signature.signature).map_err(|e| {
            InvalidSignature::with_message_and_cause("malformed signature bytes", e)
        })?;

        let bytes = bytes.as_ref();
        let checked = match self.algorithm {
            SignatureAlgorithm::Ed25519phBlake2b512 => {
                self.key
                    .verify_prehashed_strict(prehash::<Blake2b512>(bytes), None, &decoded)
            }
            SignatureAlgorithm::Ed25519phSha2512 => {
                self.key
                    .verify_prehashed_strict(prehash::<Sha512>(bytes), None, &decoded)
            }
            SignatureAlgorithm::Ed25519phSha3512 => {
                self.key
                    .verify_prehashed_strict(prehash::<Sha3_512>(bytes), None, &decoded)
            }
        };

        checked.map_err(|_| {
            warn!("rejected {} signature", self.algorithm);
            InvalidSignature::with_message("signature does not match content under the claimed key")
        })
    }
}
