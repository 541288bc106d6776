//! Asset metadata resolution
//!
//! name, symbol and decimals are independent getters on the asset contract.
//! All three must succeed or the asset is reported as failed; there is no
//! cache, every call goes back to the contract.

use alloy_primitives::Address;
use tracing::debug;

use super::error::LensError;
use super::registry::AssetProvider;
use super::types::AssetMetadata;

pub struct MetadataResolver<A> {
    provider: A,
}

impl<A: AssetProvider> MetadataResolver<A> {
    pub fn new(provider: A) -> Self {
        Self { provider }
    }

    pub async fn resolve(&self, asset: Address) -> Result<AssetMetadata, LensError> {
        let (name, symbol, decimals) = futures::try_join!(
            self.provider.name(asset),
            self.provider.symbol(asset),
            self.provider.decimals(asset),
        )?;

        debug!("Resolved {:?} as {} ({} decimals)", asset, symbol, decimals);

        Ok(AssetMetadata {
            address: asset,
            name,
            symbol,
            decimals,
        })
    }
}
