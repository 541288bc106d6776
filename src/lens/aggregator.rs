//! Position Aggregator
//!
//! Enumerates an owner's positions and joins each one with its pool's live
//! `slot0` and both assets' metadata.
//!
//! Per position: 1 index read + 1 position read + 1 pool read + 2x3 metadata
//! reads. Positions are assembled concurrently (bounded by
//! `LensSettings::max_concurrency`) and returned in registry enumeration
//! order.
//!
//! ## Consistency
//!
//! Nothing is held across the batch. The registry and pools may change between
//! the count read and the later index/position/pool reads, so the result is a
//! best-effort snapshot, not a point-in-time view of the whole list. A
//! concurrent transfer can make a late index read fail, which fails the call.

use alloy_primitives::{aliases::U24, Address};
use futures::{stream, StreamExt, TryStreamExt};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::error::LensError;
use super::metadata::MetadataResolver;
use super::pool_address::derive_pool_identity;
use super::registry::{AssetProvider, PoolStateReader, PositionRegistry};
use super::types::{FeeTier, LensSettings, PositionRecord};

pub struct PositionAggregator<P, S, A> {
    positions: P,
    pools: S,
    metadata: MetadataResolver<A>,
    settings: LensSettings,
}

impl<P, S, A> PositionAggregator<P, S, A>
where
    P: PositionRegistry,
    S: PoolStateReader,
    A: AssetProvider,
{
    pub fn new(positions: P, pools: S, assets: A, settings: LensSettings) -> Self {
        Self {
            positions,
            pools,
            metadata: MetadataResolver::new(assets),
            settings,
        }
    }

    /// Every position `owner` holds, in registry enumeration order.
    ///
    /// All-or-nothing: the first failed read aborts the batch and no records
    /// are returned.
    pub async fn list_positions(&self, owner: Address) -> Result<Vec<PositionRecord>, LensError> {
        let start = Instant::now();

        let count = self.positions.owned_count(owner).await?;
        debug!("Owner {:?} holds {} positions", owner, count);

        if count == 0 {
            return Ok(Vec::new());
        }

        let records: Vec<PositionRecord> = stream::iter(0..count)
            .map(|index| self.assemble(owner, index))
            .buffered(self.settings.max_concurrency.max(1))
            .try_collect()
            .await?;

        info!(
            "Aggregated {} positions for {:?} in {:?}",
            records.len(),
            owner,
            start.elapsed()
        );

        Ok(records)
    }

    async fn assemble(&self, owner: Address, index: usize) -> Result<PositionRecord, LensError> {
        let token_id = self.positions.owned_id_at(owner, index).await?;
        let raw = self.positions.read_position(token_id).await?;

        if !raw.is_canonical() {
            warn!(
                "Position {} reported unordered assets {:?}/{:?}, reordering",
                token_id, raw.token0, raw.token1
            );
        }
        let raw = raw.canonicalized();

        if FeeTier::from_raw(raw.fee).is_none() {
            warn!("Position {} uses unrecognized fee tier {}", token_id, raw.fee);
        }

        let fee = U24::try_from(raw.fee).ok().ok_or_else(|| LensError::PositionRegistry {
            call: "positions",
            subject: format!("position {}", token_id),
            reason: format!("fee {} does not fit in uint24", raw.fee),
        })?;

        let pool_id = derive_pool_identity(
            self.settings.factory,
            self.settings.pool_init_code_hash,
            raw.token0,
            raw.token1,
            fee,
        );

        let (state, asset0, asset1) = futures::try_join!(
            self.pools.read_state(pool_id),
            self.metadata.resolve(raw.token0),
            self.metadata.resolve(raw.token1),
        )?;

        debug!(
            "Position {} in pool {:?}: {}/{} tick {}",
            token_id, pool_id, asset0.symbol, asset1.symbol, state.tick
        );

        Ok(PositionRecord {
            token_id,
            asset0,
            asset1,
            fee_tier: raw.fee,
            pool_id,
            tick_lower: raw.tick_lower,
            tick_upper: raw.tick_upper,
            liquidity: raw.liquidity,
            fee_growth_inside0_last_x128: raw.fee_growth_inside0_last_x128,
            fee_growth_inside1_last_x128: raw.fee_growth_inside1_last_x128,
            tokens_owed0: raw.tokens_owed0,
            tokens_owed1: raw.tokens_owed1,
            current_sqrt_price_x96: state.sqrt_price_x96,
            current_tick: state.tick,
        })
    }
}
