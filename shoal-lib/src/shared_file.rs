use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::encoding;
use crate::error::FileError;

/// BLAKE3 digest over a file's piece hashes, the file's content-addressed
/// identity. Two files with the same root hash are the same content no
/// matter where they live on disk.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RootHash(pub [u8; 32]);

impl RootHash {
    pub const LENGTH: usize = 32;

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        encoding::encode(self.0)
    }

    pub fn from_base64<S: AsRef<str>>(text: S) -> Result<Self, String> {
        let bytes = encoding::decode(text.as_ref())
            .map_err(|e| format!("invalid base64 root hash: {e}"))?;
        let array: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            format!(
                "root hash must be {} bytes, got {}",
                Self::LENGTH,
                bytes.len()
            )
        })?;
        Ok(Self(array))
    }
}

impl fmt::Display for RootHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl fmt::Debug for RootHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RootHash({})", self.to_base64())
    }
}

impl Serialize for RootHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for RootHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de;

        let text = String::deserialize(deserializer)?;
        Self::from_base64(&text).map_err(de::Error::custom)
    }
}

/// Identity shared by published and downloaded files, independent of
/// provenance. Code that does not care where a file came from takes this
/// instead of a concrete record type.
pub trait FileIdentity {
    fn path(&self) -> &Path;
    fn root_hash(&self) -> &RootHash;
    fn piece_size(&self) -> u64;
    fn shared_time(&self) -> DateTime<Utc>;
}

/// A local file published under its content-addressed identity.
///
/// All fields are set once at construction and never mutated, so values
/// can be shared freely across threads.
///
/// Deserialization re-checks the piece size but not the path: a stored
/// record may legitimately outlive the file it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFile {
    path: PathBuf,
    root_hash: RootHash,
    #[serde(deserialize_with = "positive_piece_size")]
    piece_size: u64,
    shared_time: DateTime<Utc>,
}

fn positive_piece_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    use serde::de;

    let piece_size = u64::deserialize(deserializer)?;
    if piece_size == 0 {
        return Err(de::Error::custom("piece size must be positive"));
    }
    Ok(piece_size)
}

impl SharedFile {
    /// Fails when the file cannot be stat'd or `piece_size` is zero. The
    /// caller decides whether to retry after a filesystem event or give up.
    pub fn new<P: AsRef<Path>>(
        path: P,
        root_hash: RootHash,
        piece_size: u64,
        shared_time: DateTime<Utc>,
    ) -> Result<Self, FileError> {
        if piece_size == 0 {
            return Err(FileError::InvalidPieceSize(piece_size));
        }
        let path = path.as_ref().to_path_buf();
        fs::metadata(&path).map_err(|source| FileError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            root_hash,
            piece_size,
            shared_time,
        })
    }
}

impl FileIdentity for SharedFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn root_hash(&self) -> &RootHash {
        &self.root_hash
    }

    fn piece_size(&self) -> u64 {
        self.piece_size
    }

    fn shared_time(&self) -> DateTime<Utc> {
        self.shared_time
    }
}
