use async_trait::async_trait;
use log::trace;
use squeak_display::{Network, SqueakDisplay};
use squeak_ref::SqueakRef;
use std::collections::{HashMap, HashSet};
use thiserror::Error as ThisError;

#[derive(Clone, Debug, ThisError)]
pub enum FetchError {
    #[error("Squeak not found: {0}")]
    NotFound(SqueakRef),
    #[error("Fetch failed, cause: {0}")]
    Backend(String),
}

/// Client-side contract of the backing node.
///
/// Every call completes at most once and is safe to repeat for the same
/// hash. No ordering is guaranteed between outstanding calls.
#[async_trait]
pub trait SqueakFetcher {
    /// Fetch a single squeak by its hash.
    async fn fetch_squeak(&self, hash: &SqueakRef) -> Result<SqueakDisplay, FetchError>;

    /// Fetch the loaded reply chain ending at the given squeak, ordered
    /// from the earliest known ancestor to the squeak itself.
    async fn fetch_ancestors(&self, hash: &SqueakRef) -> Result<Vec<SqueakDisplay>, FetchError>;

    /// Fetch the direct replies to the given squeak.
    async fn fetch_replies(&self, hash: &SqueakRef) -> Result<Vec<SqueakDisplay>, FetchError>;

    /// Which chain the node follows.
    async fn fetch_network(&self) -> Result<Network, FetchError>;
}

/// Hash-keyed squeak store backing the `SqueakFetcher` contract in memory.
/// Stands in for the node in tests and local tooling.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    squeaks: HashMap<SqueakRef, SqueakDisplay>,
    network: Network,
}

impl MemoryFetcher {
    pub fn new(network: Network) -> Self {
        Self {
            squeaks: HashMap::new(),
            network,
        }
    }

    pub fn from_squeaks(network: Network, squeaks: impl IntoIterator<Item = SqueakDisplay>) -> Self {
        let mut fetcher = Self::new(network);
        for squeak in squeaks {
            fetcher.insert(squeak);
        }
        fetcher
    }

    /// Load a store from a JSON array of display entries, as the node
    /// would serve them.
    pub fn from_json(network: Network, json: &str) -> Result<Self, serde_json::Error> {
        let squeaks: Vec<SqueakDisplay> = serde_json::from_str(json)?;
        Ok(Self::from_squeaks(network, squeaks))
    }

    pub fn insert(&mut self, squeak: SqueakDisplay) {
        self.squeaks.insert(squeak.hash.clone(), squeak);
    }

    pub fn remove(&mut self, hash: &SqueakRef) {
        self.squeaks.remove(hash);
    }
}

#[async_trait]
impl SqueakFetcher for MemoryFetcher {
    async fn fetch_squeak(&self, hash: &SqueakRef) -> Result<SqueakDisplay, FetchError> {
        trace!("fetch squeak {}", hash);
        self.squeaks
            .get(hash)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(hash.clone()))
    }

    async fn fetch_ancestors(&self, hash: &SqueakRef) -> Result<Vec<SqueakDisplay>, FetchError> {
        trace!("fetch ancestors of {}", hash);
        let mut chain = vec![self.fetch_squeak(hash).await?];
        let mut seen: HashSet<SqueakRef> = HashSet::from([hash.clone()]);

        // walk reply links until the parent is unknown or already visited
        loop {
            let parent_hash = match chain.last().and_then(|squeak| squeak.reply_to.clone()) {
                Some(parent_hash) if !seen.contains(&parent_hash) => parent_hash,
                _ => break,
            };
            match self.squeaks.get(&parent_hash) {
                Some(parent) => {
                    seen.insert(parent_hash);
                    chain.push(parent.clone());
                }
                None => break,
            }
        }

        chain.reverse();
        Ok(chain)
    }

    async fn fetch_replies(&self, hash: &SqueakRef) -> Result<Vec<SqueakDisplay>, FetchError> {
        trace!("fetch replies of {}", hash);
        let mut replies: Vec<SqueakDisplay> = self
            .squeaks
            .values()
            .filter(|squeak| squeak.reply_to.as_ref() == Some(hash))
            .cloned()
            .collect();
        replies.sort_by_key(|squeak| (squeak.block_time, squeak.hash.to_string()));
        Ok(replies)
    }

    async fn fetch_network(&self) -> Result<Network, FetchError> {
        Ok(self.network)
    }
}
