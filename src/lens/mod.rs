//! Position Lens
//!
//! Read-only view over the liquidity positions an address owns.
//!
//! ## Key Components
//!
//! - **pool_address**: CREATE2 pool derivation from a canonical pool key
//! - **MetadataResolver**: name/symbol/decimals per asset, all-or-nothing
//! - **PositionAggregator**: count, enumerate, read, join, in registry order
//! - **RpcReader**: `eth_call` implementation of the external read traits

mod aggregator;
mod error;
mod metadata;
mod pool_address;
mod registry;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::PositionAggregator;
pub use error::{LensError, MetadataField};
pub use pool_address::{derive_pool_identity, PoolKey};
pub use registry::{AssetProvider, PoolStateReader, PositionRegistry, RpcReader};
pub use types::{
    describe_fee, AssetMetadata, FeeTier, LensSettings, PositionRecord, DEFAULT_MAX_CONCURRENCY,
    UNISWAP_V3_FACTORY, UNISWAP_V3_POOL_INIT_CODE_HASH, UNISWAP_V3_POSITION_MANAGER,
};
