use std::collections::VecDeque;

use log::{debug, info};

use crate::downloaded_file::DownloadedFile;
use crate::shared_file::{FileIdentity, RootHash};

/// Completed downloads in completion order, oldest first.
///
/// Bounded: once `capacity` records are held, recording another evicts the
/// oldest, and a zero-capacity history keeps nothing at all. Records are
/// never merged or rewritten once recorded.
#[derive(Debug, Clone)]
pub struct DownloadHistory {
    records: VecDeque<DownloadedFile>,
    capacity: usize,
}

impl DownloadHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, file: DownloadedFile) {
        if self.capacity == 0 {
            debug!("dropped download record for {}", file.root_hash());
            return;
        }
        while self.records.len() >= self.capacity {
            match self.records.pop_front() {
                Some(evicted) => debug!("evicted download record for {}", evicted.root_hash()),
                None => break,
            }
        }
        info!(
            "recorded download of {} from {} sources",
            file.root_hash(),
            file.sources().len()
        );
        self.records.push_back(file);
    }

    /// Every record for this root hash, one per completed download event.
    pub fn for_root_hash<'a>(
        &'a self,
        root_hash: &'a RootHash,
    ) -> impl Iterator<Item = &'a DownloadedFile> {
        self.records
            .iter()
            .filter(move |record| record.root_hash() == root_hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DownloadedFile> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
