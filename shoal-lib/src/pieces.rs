use std::{fs::File, path::Path};

use log::debug;
use memmap2::Mmap;

use crate::error::FileError;
use crate::shared_file::RootHash;

/// Hash a file into its content-addressed identity: BLAKE3 of each
/// `piece_size` chunk, then BLAKE3 over the concatenated piece digests.
pub fn root_hash_file<P: AsRef<Path>>(path: P, piece_size: u64) -> Result<RootHash, FileError> {
    if piece_size == 0 {
        return Err(FileError::InvalidPieceSize(piece_size));
    }
    let io_err = |source| FileError::Io {
        path: path.as_ref().to_path_buf(),
        source,
    };
    let file = File::open(path.as_ref()).map_err(io_err)?;
    let mmap = unsafe { Mmap::map(&file) }.map_err(io_err)?;
    debug!(
        "hashing {} ({} pieces of {} bytes)",
        path.as_ref().display(),
        piece_count(mmap.len() as u64, piece_size),
        piece_size
    );
    root_hash_bytes(&mmap[..], piece_size)
}

pub fn root_hash_bytes<B: AsRef<[u8]>>(bytes: B, piece_size: u64) -> Result<RootHash, FileError> {
    if piece_size == 0 {
        return Err(FileError::InvalidPieceSize(piece_size));
    }
    let mut tree = blake3::Hasher::new();
    for piece in bytes.as_ref().chunks(piece_size as usize) {
        tree.update(blake3::hash(piece).as_bytes());
    }
    Ok(RootHash(*tree.finalize().as_bytes()))
}

/// Number of pieces a file of `size` bytes splits into. Callers validate
/// `piece_size` before getting here.
fn piece_count(size: u64, piece_size: u64) -> u64 {
    size.div_ceil(piece_size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_file::tests::temp_file;

    #[test]
    fn file_and_byte_hashing_agree() {
        let contents = b"piece one piece two piece three".to_vec();
        let path = temp_file(&contents);
        assert_eq!(
            root_hash_file(&path, 10).unwrap(),
            root_hash_bytes(&contents, 10).unwrap()
        );
    }

    #[test]
    fn content_changes_change_the_root() {
        let a = root_hash_bytes(b"first contents", 4).unwrap();
        let b = root_hash_bytes(b"other contents", 4).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn piece_size_changes_change_the_root() {
        let a = root_hash_bytes(b"the same contents", 4).unwrap();
        let b = root_hash_bytes(b"the same contents", 8).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn hashing_is_deterministic() {
        let a = root_hash_bytes(b"stable", 2).unwrap();
        let b = root_hash_bytes(b"stable", 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn zero_piece_size_is_rejected() {
        assert!(matches!(
            root_hash_bytes(b"anything", 0),
            Err(FileError::InvalidPieceSize(0))
        ));
        let path = temp_file(b"anything");
        assert!(root_hash_file(&path, 0).is_err());
    }

    #[test]
    fn piece_counts() {
        assert_eq!(piece_count(0, 1024), 0);
        assert_eq!(piece_count(1024, 1024), 1);
        assert_eq!(piece_count(1025, 1024), 2);
    }
}
