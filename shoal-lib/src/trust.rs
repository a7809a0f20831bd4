use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

/// How much a peer is trusted as a source of files and search results.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Hash, EnumString, Display,
)]
pub enum TrustStatus {
    Trusted,
    #[default]
    Neutral,
    Distrusted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustEntry {
    pub peer: Url,
    pub status: TrustStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub updated: DateTime<Utc>,
}

/// Per-user list of trust judgements, keyed by peer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustList {
    pub updated: DateTime<Utc>,
    entries: BTreeMap<Url, TrustEntry>,
}

impl TrustList {
    pub fn new() -> Self {
        Self {
            updated: Utc::now(),
            entries: BTreeMap::new(),
        }
    }

    pub fn set_status(&mut self, peer: Url, status: TrustStatus, reason: Option<String>) {
        let now = Utc::now();
        self.entries.insert(
            peer.clone(),
            TrustEntry {
                peer,
                status,
                reason,
                updated: now,
            },
        );
        self.updated = now;
    }

    /// Peers without an entry are neutral.
    pub fn status_of(&self, peer: &Url) -> TrustStatus {
        self.entries
            .get(peer)
            .map(|entry| entry.status)
            .unwrap_or_default()
    }

    pub fn get(&self, peer: &Url) -> Option<&TrustEntry> {
        self.entries.get(peer)
    }

    /// (trusted, distrusted) entry counts.
    pub fn counts(&self) -> (usize, usize) {
        let trusted = self
            .entries
            .values()
            .filter(|e| e.status == TrustStatus::Trusted)
            .count();
        let distrusted = self
            .entries
            .values()
            .filter(|e| e.status == TrustStatus::Distrusted)
            .count();
        (trusted, distrusted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrustEntry> {
        self.entries.values()
    }
}

impl Default for TrustList {
    fn default() -> Self {
        Self::new()
    }
}
