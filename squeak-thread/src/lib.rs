use itertools::Itertools;
use log::debug;
use squeak_display::{Network, SqueakDisplay};
use squeak_fetch::{FetchError, SqueakFetcher};
use squeak_ref::SqueakRef;

/// One row of the ancestor timeline.
///
/// The oldest loaded squeak may itself be a reply, in which case the
/// timeline leads with an `UnknownAncestor` stand-in carrying only the
/// hash of the not-yet-loaded parent.
#[derive(Clone, Debug, PartialEq)]
pub enum ThreadNode {
    Squeak(SqueakDisplay),
    UnknownAncestor(SqueakRef),
}

impl ThreadNode {
    /// Stable key for identity-preserving view updates.
    pub fn key(&self) -> &SqueakRef {
        match self {
            ThreadNode::Squeak(squeak) => &squeak.hash,
            ThreadNode::UnknownAncestor(hash) => hash,
        }
    }
}

/// Derive the ancestor timeline from a reply chain.
///
/// `chain` is ordered oldest first and ends with the focal squeak, which
/// is rendered separately by the caller and therefore excluded here. If
/// the oldest loaded squeak replies to something outside the chain, a
/// single `UnknownAncestor` node is prepended for it.
pub fn build_thread(chain: &[SqueakDisplay]) -> Vec<ThreadNode> {
    let mut nodes: Vec<ThreadNode> = Vec::with_capacity(chain.len());
    if let Some(unknown_ancestor) = chain.first().and_then(|oldest| oldest.reply_to.clone()) {
        nodes.push(ThreadNode::UnknownAncestor(unknown_ancestor));
    }
    nodes.extend(
        chain
            .iter()
            .dropping_back(1)
            .cloned()
            .map(ThreadNode::Squeak),
    );
    nodes
}

/// Replace the squeak matching `fresh` by hash, leaving the rest of the
/// chain untouched. A chain with no matching element is returned as-is:
/// the target may have left the loaded window while the fetch was in
/// flight.
pub fn replace_squeak(chain: &[SqueakDisplay], fresh: SqueakDisplay) -> Vec<SqueakDisplay> {
    if !chain.iter().any(|squeak| squeak.hash == fresh.hash) {
        debug!("squeak {} is no longer in the chain, skipping", fresh.hash);
        return chain.to_vec();
    }
    chain
        .iter()
        .map(|squeak| {
            if squeak.hash == fresh.hash {
                fresh.clone()
            } else {
                squeak.clone()
            }
        })
        .collect()
}

/// Re-fetch a single squeak and apply it to the chain.
///
/// On fetch failure the error is surfaced and no new chain is produced;
/// the caller keeps rendering its current state. Overlapping refreshes
/// are independent: each applies against whatever chain is current when
/// its fetch completes, so the most recent completion per hash wins.
pub async fn refresh_squeak<F>(
    chain: &[SqueakDisplay],
    hash: &SqueakRef,
    fetcher: &F,
) -> Result<Vec<SqueakDisplay>, FetchError>
where
    F: SqueakFetcher + ?Sized,
{
    debug!("refreshing squeak {}", hash);
    let fresh = fetcher.fetch_squeak(hash).await?;
    Ok(replace_squeak(chain, fresh))
}

/// View state for one squeak page: the reply chain ending at the focal
/// squeak, its direct replies, and the node's network for link rendering.
///
/// The chain is held as an immutable value and replaced wholesale by each
/// update, so in-flight refreshes never observe partial mutation.
#[derive(Clone, Debug, Default)]
pub struct ThreadPage {
    chain: Vec<SqueakDisplay>,
    replies: Vec<SqueakDisplay>,
    network: Network,
}

impl ThreadPage {
    pub async fn load<F>(fetcher: &F, hash: &SqueakRef) -> Result<Self, FetchError>
    where
        F: SqueakFetcher + ?Sized,
    {
        let chain = fetcher.fetch_ancestors(hash).await?;
        let replies = fetcher.fetch_replies(hash).await?;
        let network = fetcher.fetch_network().await?;
        Ok(Self {
            chain,
            replies,
            network,
        })
    }

    /// The ancestor timeline for the current chain. Recomputed on each
    /// call; two calls against the same chain yield the same nodes.
    pub fn timeline(&self) -> Vec<ThreadNode> {
        build_thread(&self.chain)
    }

    /// The squeak this page is about.
    pub fn focal(&self) -> Option<&SqueakDisplay> {
        self.chain.last()
    }

    pub fn chain(&self) -> &[SqueakDisplay] {
        &self.chain
    }

    pub fn replies(&self) -> &[SqueakDisplay] {
        &self.replies
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn set_chain(&mut self, chain: Vec<SqueakDisplay>) {
        self.chain = chain;
    }

    /// Re-fetch one squeak in the chain, e.g. after an action against it
    /// completed. Failures leave the page untouched.
    pub async fn refresh<F>(&mut self, hash: &SqueakRef, fetcher: &F) -> Result<(), FetchError>
    where
        F: SqueakFetcher + ?Sized,
    {
        let chain = refresh_squeak(&self.chain, hash, fetcher).await?;
        self.chain = chain;
        Ok(())
    }

    /// Same replacement policy for the replies below the focal squeak.
    pub async fn refresh_reply<F>(
        &mut self,
        hash: &SqueakRef,
        fetcher: &F,
    ) -> Result<(), FetchError>
    where
        F: SqueakFetcher + ?Sized,
    {
        let fresh = fetcher.fetch_squeak(hash).await?;
        self.replies = replace_squeak(&self.replies, fresh);
        Ok(())
    }
}
