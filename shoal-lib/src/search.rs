use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::shared_file::RootHash;

/// One file offered by one peer in response to a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub sender: Url,
    pub root_hash: RootHash,
    pub name: String,
    pub size: u64,
}

/// Results accumulated for a single query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub uuid: Uuid,
    pub query: String,
    results: Vec<SearchResult>,
}

impl SearchResults {
    pub fn new<S: Into<String>>(query: S) -> Self {
        Self {
            uuid: generate_uuid(),
            query: query.into(),
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: SearchResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Number of distinct peers that answered.
    pub fn senders(&self) -> usize {
        self.by_sender().len()
    }

    pub fn by_sender(&self) -> BTreeMap<&Url, Vec<&SearchResult>> {
        let mut grouped: BTreeMap<&Url, Vec<&SearchResult>> = BTreeMap::new();
        for result in &self.results {
            grouped.entry(&result.sender).or_default().push(result);
        }
        grouped
    }

    pub fn by_file(&self) -> BTreeMap<&RootHash, Vec<&SearchResult>> {
        let mut grouped: BTreeMap<&RootHash, Vec<&SearchResult>> = BTreeMap::new();
        for result in &self.results {
            grouped.entry(&result.root_hash).or_default().push(result);
        }
        grouped
    }
}

pub fn generate_uuid() -> Uuid {
    let mut rng = rand::thread_rng();
    Uuid::from_u128(rng.gen())
}
