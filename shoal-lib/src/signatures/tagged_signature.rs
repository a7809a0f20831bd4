use serde::{Deserialize, Serialize};

use super::algorithms::SignatureAlgorithm;
use crate::encoding;

/// A signature over file metadata, tagged with the algorithm that produced
/// it so the verifier can pick the matching digest.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TaggedSignature {
    pub algorithm: SignatureAlgorithm,
    #[serde(
        serialize_with = "encoding::as_base64",
        deserialize_with = "encoding::from_base64"
    )]
    pub signature: Vec<u8>,
}
