use std::{collections::HashSet, path::Path};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FileError;
use crate::shared_file::{FileIdentity, RootHash, SharedFile};

/// A file whose download has completed, together with the peers that
/// supplied at least one verified piece of it.
///
/// One record exists per completed download event. Records for the same
/// root hash are never merged; each keeps the provenance snapshot taken
/// when its own download finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedFile {
    file: SharedFile,
    sources: HashSet<Url>,
}

impl DownloadedFile {
    /// Construction copies `sources`, so later mutation of the caller's
    /// collection cannot reach this record. An empty set is legal: a
    /// download may finish with provenance tracking disabled upstream.
    ///
    /// Fails under the same conditions as [`SharedFile::new`]; the
    /// contents of `sources` are the caller's responsibility.
    pub fn new<P: AsRef<Path>>(
        path: P,
        root_hash: RootHash,
        piece_size: u64,
        shared_time: DateTime<Utc>,
        sources: &HashSet<Url>,
    ) -> Result<Self, FileError> {
        let file = SharedFile::new(path, root_hash, piece_size, shared_time)?;
        Ok(Self {
            file,
            sources: sources.clone(),
        })
    }

    pub fn shared_file(&self) -> &SharedFile {
        &self.file
    }

    /// The exact set supplied at construction, read-only.
    pub fn sources(&self) -> &HashSet<Url> {
        &self.sources
    }
}

impl FileIdentity for DownloadedFile {
    fn path(&self) -> &Path {
        self.file.path()
    }

    fn root_hash(&self) -> &RootHash {
        self.file.root_hash()
    }

    fn piece_size(&self) -> u64 {
        self.file.piece_size()
    }

    fn shared_time(&self) -> DateTime<Utc> {
        self.file.shared_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared_file::tests::temp_file;

    fn peer(port: u16) -> Url {
        Url::parse(&format!("https://peer{port}.example.net:{port}/")).unwrap()
    }

    #[test]
    fn sources_are_reported_exactly() {
        let path = temp_file(b"downloaded content");
        let sources: HashSet<Url> = [peer(4001), peer(4002)].into_iter().collect();

        let record = DownloadedFile::new(
            &path,
            RootHash::from_bytes([9u8; 32]),
            4096,
            Utc::now(),
            &sources,
        )
        .unwrap();
        assert_eq!(record.sources(), &sources);
        assert_eq!(record.piece_size(), 4096);
    }

    #[test]
    fn record_is_a_snapshot_of_sources() {
        let path = temp_file(b"snapshot");
        let mut sources: HashSet<Url> = [peer(4001)].into_iter().collect();

        let record = DownloadedFile::new(
            &path,
            RootHash::from_bytes([1u8; 32]),
            1024,
            Utc::now(),
            &sources,
        )
        .unwrap();

        sources.insert(peer(4002));
        sources.remove(&peer(4001));
        assert_eq!(record.sources().len(), 1);
        assert!(record.sources().contains(&peer(4001)));
    }

    #[test]
    fn empty_sources_are_legal() {
        let path = temp_file(b"no provenance");
        let record = DownloadedFile::new(
            &path,
            RootHash::from_bytes([2u8; 32]),
            1024,
            Utc::now(),
            &HashSet::new(),
        )
        .unwrap();
        assert!(record.sources().is_empty());
    }

    #[test]
    fn missing_file_produces_no_record() {
        let path = std::env::temp_dir().join("shoal-test-not-downloaded");
        let result = DownloadedFile::new(
            &path,
            RootHash::from_bytes([3u8; 32]),
            1024,
            Utc::now(),
            &HashSet::new(),
        );
        assert!(matches!(result, Err(FileError::Io { .. })));
    }

    #[test]
    fn records_with_equal_root_hash_do_not_merge() {
        let hash = RootHash::from_bytes([5u8; 32]);
        let first_sources: HashSet<Url> = [peer(4001)].into_iter().collect();
        let second_sources: HashSet<Url> = [peer(4002), peer(4003)].into_iter().collect();

        let first = DownloadedFile::new(
            temp_file(b"same content"),
            hash,
            1024,
            Utc::now(),
            &first_sources,
        )
        .unwrap();
        let second = DownloadedFile::new(
            temp_file(b"same content"),
            hash,
            1024,
            Utc::now(),
            &second_sources,
        )
        .unwrap();

        assert_eq!(first.root_hash(), second.root_hash());
        assert_eq!(first.sources(), &first_sources);
        assert_eq!(second.sources(), &second_sources);
    }

    #[test]
    fn identity_is_uniform_across_record_shapes() {
        fn describe(file: &dyn FileIdentity) -> String {
            format!("{}@{}", file.root_hash(), file.piece_size())
        }

        let hash = RootHash::from_bytes([6u8; 32]);
        let shared = SharedFile::new(temp_file(b"a"), hash, 2048, Utc::now()).unwrap();
        let downloaded =
            DownloadedFile::new(temp_file(b"a"), hash, 2048, Utc::now(), &HashSet::new()).unwrap();
        assert_eq!(describe(&shared), describe(&downloaded));
    }
}
