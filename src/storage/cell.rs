//! Lazily loaded cache generation

use tokio::sync::{OnceCell, RwLock};
use tracing::debug;

use crate::error::StoreResult;
use crate::storage::cache::TypedCache;
use crate::storage::channel::StateChannel;
use crate::storage::codec;

/// Memoized fetch-and-decode of one cache generation
///
/// The first resolver triggers the host read; resolvers arriving while that
/// read is in flight share its result, and every later resolver reuses the
/// decoded cache without another round trip. A failed load is not memoized:
/// the error goes to the caller that triggered it and the next access starts
/// a fresh load. There is no in-place reset; the owner discards the whole
/// cell and replaces it.
#[derive(Debug, Default)]
pub(crate) struct CacheCell {
    slot: OnceCell<RwLock<TypedCache>>,
}

impl CacheCell {
    /// Creates an unarmed cell; nothing is fetched until first resolution
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Resolves the loaded generation, fetching from the host at most once
    ///
    /// An absent host blob decodes to an empty cache; resolution never writes
    /// to the host.
    pub(crate) async fn get_or_load<C: StateChannel>(
        &self,
        channel: &C,
    ) -> StoreResult<&RwLock<TypedCache>> {
        self.slot
            .get_or_try_init(|| async {
                let cache = match channel.get().await? {
                    Some(blob) => codec::decode(blob)?,
                    None => TypedCache::new(),
                };
                debug!(entries = cache.len(), "loaded state from host channel");
                Ok(RwLock::new(cache))
            })
            .await
    }
}
