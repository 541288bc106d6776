//! External read surfaces
//!
//! The position registry, the pools and the asset contracts are opaque
//! read-only services. Each gets a trait so the aggregator can be driven
//! against a live node or an in-memory chain.

use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use eyre::Result;
use tracing::trace;

use super::error::{LensError, MetadataField};
use super::types::{
    IERC20Metadata, INonfungiblePositionManager, IUniswapV3Pool, PoolState, RawPosition,
};

/// Enumerable position registry (count + indexed read)
#[async_trait]
pub trait PositionRegistry: Send + Sync {
    async fn owned_count(&self, owner: Address) -> Result<usize, LensError>;

    /// Enumeration order is the registry's, and may shift if it is mutated
    /// between calls.
    async fn owned_id_at(&self, owner: Address, index: usize) -> Result<U256, LensError>;

    async fn read_position(&self, token_id: U256) -> Result<RawPosition, LensError>;
}

#[async_trait]
pub trait PoolStateReader: Send + Sync {
    async fn read_state(&self, pool: Address) -> Result<PoolState, LensError>;
}

/// ERC-20 metadata extension, addressed per asset
#[async_trait]
pub trait AssetProvider: Send + Sync {
    async fn name(&self, asset: Address) -> Result<String, LensError>;

    async fn symbol(&self, asset: Address) -> Result<String, LensError>;

    async fn decimals(&self, asset: Address) -> Result<u8, LensError>;
}

// ============================================
// JSON-RPC READER
// ============================================

/// `eth_call` backed implementation of every read surface
#[derive(Clone)]
pub struct RpcReader {
    provider: DynProvider,
    position_manager: Address,
}

impl RpcReader {
    pub fn new(rpc_url: &str, position_manager: Address) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .connect_http(rpc_url.parse()?)
            .erased();

        Ok(Self {
            provider,
            position_manager,
        })
    }

    pub fn position_manager(&self) -> Address {
        self.position_manager
    }

    async fn eth_call(&self, to: Address, calldata: Vec<u8>) -> Result<Bytes, String> {
        let tx = TransactionRequest::default()
            .to(to)
            .input(calldata.into());

        self.provider
            .call(tx)
            .await
            .map_err(|e| format!("eth_call failed: {}", e))
    }

    async fn call_decoded<C: SolCall>(&self, to: Address, call: C) -> Result<C::Return, String> {
        trace!("eth_call {} -> {:?}", C::SIGNATURE, to);
        let data = self.eth_call(to, call.abi_encode()).await?;
        C::abi_decode_returns(&data).map_err(|e| format!("failed to decode {}: {}", C::SIGNATURE, e))
    }

    async fn metadata<C: SolCall>(
        &self,
        asset: Address,
        field: MetadataField,
        call: C,
    ) -> Result<C::Return, LensError> {
        self.call_decoded(asset, call)
            .await
            .map_err(|reason| LensError::AssetMetadata {
                asset,
                field,
                reason,
            })
    }
}

#[async_trait]
impl PositionRegistry for RpcReader {
    async fn owned_count(&self, owner: Address) -> Result<usize, LensError> {
        let registry_err = |reason: String| LensError::PositionRegistry {
            call: "balanceOf",
            subject: format!("owner {}", owner),
            reason,
        };

        let balance = self
            .call_decoded(
                self.position_manager,
                INonfungiblePositionManager::balanceOfCall { owner },
            )
            .await
            .map_err(registry_err)?;

        usize::try_from(balance).map_err(|_| registry_err(format!("balance {} out of range", balance)))
    }

    async fn owned_id_at(&self, owner: Address, index: usize) -> Result<U256, LensError> {
        self.call_decoded(
            self.position_manager,
            INonfungiblePositionManager::tokenOfOwnerByIndexCall {
                owner,
                index: U256::from(index),
            },
        )
        .await
        .map_err(|reason| LensError::PositionRegistry {
            call: "tokenOfOwnerByIndex",
            subject: format!("owner {} index {}", owner, index),
            reason,
        })
    }

    async fn read_position(&self, token_id: U256) -> Result<RawPosition, LensError> {
        self.call_decoded(
            self.position_manager,
            INonfungiblePositionManager::positionsCall { tokenId: token_id },
        )
        .await
        .map(RawPosition::from)
        .map_err(|reason| LensError::PositionRegistry {
            call: "positions",
            subject: format!("position {}", token_id),
            reason,
        })
    }
}

#[async_trait]
impl PoolStateReader for RpcReader {
    async fn read_state(&self, pool: Address) -> Result<PoolState, LensError> {
        let slot0 = self
            .call_decoded(pool, IUniswapV3Pool::slot0Call {})
            .await
            .map_err(|reason| LensError::PoolState { pool, reason })?;

        Ok(PoolState {
            sqrt_price_x96: slot0.sqrtPriceX96,
            tick: slot0.tick.as_i32(),
        })
    }
}

#[async_trait]
impl AssetProvider for RpcReader {
    async fn name(&self, asset: Address) -> Result<String, LensError> {
        self.metadata(asset, MetadataField::Name, IERC20Metadata::nameCall {})
            .await
    }

    async fn symbol(&self, asset: Address) -> Result<String, LensError> {
        self.metadata(asset, MetadataField::Symbol, IERC20Metadata::symbolCall {})
            .await
    }

    async fn decimals(&self, asset: Address) -> Result<u8, LensError> {
        self.metadata(asset, MetadataField::Decimals, IERC20Metadata::decimalsCall {})
            .await
    }
}
