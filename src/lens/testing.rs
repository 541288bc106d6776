//! In-memory chain for exercising the lens without a node.
//!
//! Implements every read surface, counts the reads it serves and can be told
//! to fail specific ones.

use alloy_primitives::{aliases::U160, Address, U256};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::error::{LensError, MetadataField};
use super::registry::{AssetProvider, PoolStateReader, PositionRegistry};
use super::types::{PoolState, RawPosition};

pub fn asset(last_byte: u8) -> Address {
    Address::with_last_byte(last_byte)
}

pub fn position(
    token0: Address,
    token1: Address,
    fee: u32,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> RawPosition {
    RawPosition {
        token0,
        token1,
        fee,
        tick_lower,
        tick_upper,
        liquidity,
        fee_growth_inside0_last_x128: U256::ZERO,
        fee_growth_inside1_last_x128: U256::ZERO,
        tokens_owed0: 0,
        tokens_owed1: 0,
    }
}

pub fn pool_state(sqrt_price_x96: u128, tick: i32) -> PoolState {
    PoolState {
        sqrt_price_x96: U160::from(sqrt_price_x96),
        tick,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub count: usize,
    pub index: usize,
    pub position: usize,
    pub pool: usize,
    pub metadata: usize,
}

#[derive(Default)]
struct Counters {
    count: AtomicUsize,
    index: AtomicUsize,
    position: AtomicUsize,
    pool: AtomicUsize,
    metadata: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
struct ChainData {
    owned: HashMap<Address, Vec<U256>>,
    positions: HashMap<U256, RawPosition>,
    pools: HashMap<Address, PoolState>,
    assets: HashMap<Address, (String, String, u8)>,
    failing_metadata: HashSet<(Address, MetadataField)>,
    failing_pools: HashSet<Address>,
    failing_positions: HashSet<U256>,
    failing_counts: HashSet<Address>,
    failing_indexes: HashSet<(Address, usize)>,
}

#[derive(Clone, Default)]
pub struct InMemoryChain {
    data: Arc<ChainData>,
    counters: Arc<Counters>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, owner: Address, token_id: u64, raw: RawPosition) -> Self {
        let data = Arc::make_mut(&mut self.data);
        let token_id = U256::from(token_id);
        data.owned.entry(owner).or_default().push(token_id);
        data.positions.insert(token_id, raw);
        self
    }

    pub fn with_pool(mut self, pool: Address, state: PoolState) -> Self {
        Arc::make_mut(&mut self.data).pools.insert(pool, state);
        self
    }

    pub fn with_asset(mut self, asset: Address, name: &str, symbol: &str, decimals: u8) -> Self {
        Arc::make_mut(&mut self.data)
            .assets
            .insert(asset, (name.to_string(), symbol.to_string(), decimals));
        self
    }

    pub fn failing_metadata(mut self, asset: Address, field: MetadataField) -> Self {
        Arc::make_mut(&mut self.data)
            .failing_metadata
            .insert((asset, field));
        self
    }

    pub fn failing_pool(mut self, pool: Address) -> Self {
        Arc::make_mut(&mut self.data).failing_pools.insert(pool);
        self
    }

    pub fn failing_position(mut self, token_id: u64) -> Self {
        Arc::make_mut(&mut self.data)
            .failing_positions
            .insert(U256::from(token_id));
        self
    }

    pub fn failing_count(mut self, owner: Address) -> Self {
        Arc::make_mut(&mut self.data).failing_counts.insert(owner);
        self
    }

    pub fn failing_index(mut self, owner: Address, index: usize) -> Self {
        Arc::make_mut(&mut self.data)
            .failing_indexes
            .insert((owner, index));
        self
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            count: self.counters.count.load(Ordering::SeqCst),
            index: self.counters.index.load(Ordering::SeqCst),
            position: self.counters.position.load(Ordering::SeqCst),
            pool: self.counters.pool.load(Ordering::SeqCst),
            metadata: self.counters.metadata.load(Ordering::SeqCst),
        }
    }

    fn asset_field<T>(
        &self,
        asset: Address,
        field: MetadataField,
        pick: impl FnOnce(&(String, String, u8)) -> T,
    ) -> Result<T, LensError> {
        self.counters.metadata.fetch_add(1, Ordering::SeqCst);

        let fail = |reason: &str| LensError::AssetMetadata {
            asset,
            field,
            reason: reason.to_string(),
        };

        if self.data.failing_metadata.contains(&(asset, field)) {
            return Err(fail("execution reverted"));
        }
        self.data
            .assets
            .get(&asset)
            .map(pick)
            .ok_or_else(|| fail("no contract code"))
    }
}

#[async_trait]
impl PositionRegistry for InMemoryChain {
    async fn owned_count(&self, owner: Address) -> Result<usize, LensError> {
        self.counters.count.fetch_add(1, Ordering::SeqCst);
        if self.data.failing_counts.contains(&owner) {
            return Err(LensError::PositionRegistry {
                call: "balanceOf",
                subject: format!("owner {}", owner),
                reason: "execution reverted".to_string(),
            });
        }
        Ok(self.data.owned.get(&owner).map_or(0, Vec::len))
    }

    async fn owned_id_at(&self, owner: Address, index: usize) -> Result<U256, LensError> {
        self.counters.index.fetch_add(1, Ordering::SeqCst);
        if self.data.failing_indexes.contains(&(owner, index)) {
            return Err(LensError::PositionRegistry {
                call: "tokenOfOwnerByIndex",
                subject: format!("owner {} index {}", owner, index),
                reason: "owner index out of bounds".to_string(),
            });
        }
        self.data
            .owned
            .get(&owner)
            .and_then(|ids| ids.get(index))
            .copied()
            .ok_or_else(|| LensError::PositionRegistry {
                call: "tokenOfOwnerByIndex",
                subject: format!("owner {} index {}", owner, index),
                reason: "owner index out of bounds".to_string(),
            })
    }

    async fn read_position(&self, token_id: U256) -> Result<RawPosition, LensError> {
        self.counters.position.fetch_add(1, Ordering::SeqCst);

        let fail = |reason: &str| LensError::PositionRegistry {
            call: "positions",
            subject: format!("position {}", token_id),
            reason: reason.to_string(),
        };

        if self.data.failing_positions.contains(&token_id) {
            return Err(fail("execution reverted"));
        }
        self.data
            .positions
            .get(&token_id)
            .cloned()
            .ok_or_else(|| fail("invalid token id"))
    }
}

#[async_trait]
impl PoolStateReader for InMemoryChain {
    async fn read_state(&self, pool: Address) -> Result<PoolState, LensError> {
        self.counters.pool.fetch_add(1, Ordering::SeqCst);

        let fail = |reason: &str| LensError::PoolState {
            pool,
            reason: reason.to_string(),
        };

        if self.data.failing_pools.contains(&pool) {
            return Err(fail("execution reverted"));
        }
        self.data
            .pools
            .get(&pool)
            .copied()
            .ok_or_else(|| fail("no contract code"))
    }
}

#[async_trait]
impl AssetProvider for InMemoryChain {
    async fn name(&self, asset: Address) -> Result<String, LensError> {
        self.asset_field(asset, MetadataField::Name, |(name, _, _)| name.clone())
    }

    async fn symbol(&self, asset: Address) -> Result<String, LensError> {
        self.asset_field(asset, MetadataField::Symbol, |(_, symbol, _)| symbol.clone())
    }

    async fn decimals(&self, asset: Address) -> Result<u8, LensError> {
        self.asset_field(asset, MetadataField::Decimals, |(_, _, decimals)| *decimals)
    }
}
