//! Position Lens Types, Addresses, and ABIs
//!
//! Contract interfaces, mainnet defaults and the value types that flow
//! through the aggregator. Everything here is built fresh per call.
//!
//! Default addresses are for Ethereum Mainnet Uniswap V3.

use alloy_primitives::{address, aliases::U160, b256, Address, B256, U256};
use alloy_sol_types::sol;
use serde::{Deserialize, Serialize};

// ============================================
// UNISWAP V3 CORE CONTRACTS
// ============================================

/// NonfungiblePositionManager - the position registry
pub const UNISWAP_V3_POSITION_MANAGER: Address =
    address!("C36442b4a4522E871399CD717aBDD847Ab11FE88");

/// UniswapV3Factory - deployer of every pool
pub const UNISWAP_V3_FACTORY: Address = address!("1F98431c8aD98523631AE4a59f267346ea31F984");

/// keccak256 of the UniswapV3Pool creation code
pub const UNISWAP_V3_POOL_INIT_CODE_HASH: B256 =
    b256!("e34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54");

/// Default number of positions assembled concurrently
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

// ============================================
// CONTRACT INTERFACES
// ============================================

sol! {
    /// ERC-721 enumerable surface plus the position tuple getter
    #[derive(Debug)]
    interface INonfungiblePositionManager {
        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
        function positions(uint256 tokenId) external view returns (
            uint96 nonce,
            address operator,
            address token0,
            address token1,
            uint24 fee,
            int24 tickLower,
            int24 tickUpper,
            uint128 liquidity,
            uint256 feeGrowthInside0LastX128,
            uint256 feeGrowthInside1LastX128,
            uint128 tokensOwed0,
            uint128 tokensOwed1
        );
    }

    #[derive(Debug)]
    interface IUniswapV3Pool {
        function slot0() external view returns (
            uint160 sqrtPriceX96, int24 tick, uint16 observationIndex,
            uint16 observationCardinality, uint16 observationCardinalityNext,
            uint8 feeProtocol, bool unlocked
        );
    }

    /// Optional ERC-20 metadata extension
    #[derive(Debug)]
    interface IERC20Metadata {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
    }
}

// ============================================
// FEE TIERS
// ============================================

/// Fee tiers enabled on the Uniswap V3 factory, in hundredths of a bip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeeTier {
    /// 0.01% - stable pairs
    Lowest,
    /// 0.05%
    Low,
    /// 0.30%
    Medium,
    /// 1.00% - exotic pairs
    High,
}

impl FeeTier {
    pub const ALL: [FeeTier; 4] = [FeeTier::Lowest, FeeTier::Low, FeeTier::Medium, FeeTier::High];

    pub fn from_raw(fee: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.raw() == fee)
    }

    pub fn raw(&self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3000,
            FeeTier::High => 10000,
        }
    }

    pub fn tick_spacing(&self) -> i32 {
        match self {
            FeeTier::Lowest => 1,
            FeeTier::Low => 10,
            FeeTier::Medium => 60,
            FeeTier::High => 200,
        }
    }
}

impl std::fmt::Display for FeeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}%", self.raw() as f64 / 10_000.0)
    }
}

/// Human readable fee, falling back to the raw value for tiers we don't know
pub fn describe_fee(fee: u32) -> String {
    match FeeTier::from_raw(fee) {
        Some(tier) => tier.to_string(),
        None => format!("{} (unrecognized)", fee),
    }
}

// ============================================
// READ RESULTS
// ============================================

/// Descriptive attributes of an asset at read time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Live pool price snapshot from `slot0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolState {
    pub sqrt_price_x96: U160,
    /// int24 range
    pub tick: i32,
}

/// Position fields exactly as the registry reports them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPosition {
    pub token0: Address,
    pub token1: Address,
    pub fee: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub fee_growth_inside0_last_x128: U256,
    pub fee_growth_inside1_last_x128: U256,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128,
}

impl RawPosition {
    pub fn is_canonical(&self) -> bool {
        self.token0 < self.token1
    }

    /// Orders the pair lower-address-first. The per-asset checkpoints and
    /// owed balances move with their asset.
    pub fn canonicalized(self) -> Self {
        if self.token0 <= self.token1 {
            return self;
        }
        Self {
            token0: self.token1,
            token1: self.token0,
            fee_growth_inside0_last_x128: self.fee_growth_inside1_last_x128,
            fee_growth_inside1_last_x128: self.fee_growth_inside0_last_x128,
            tokens_owed0: self.tokens_owed1,
            tokens_owed1: self.tokens_owed0,
            ..self
        }
    }
}

impl From<INonfungiblePositionManager::positionsReturn> for RawPosition {
    fn from(value: INonfungiblePositionManager::positionsReturn) -> Self {
        Self {
            token0: value.token0,
            token1: value.token1,
            fee: value.fee.to::<u32>(),
            tick_lower: value.tickLower.as_i32(),
            tick_upper: value.tickUpper.as_i32(),
            liquidity: value.liquidity,
            fee_growth_inside0_last_x128: value.feeGrowthInside0LastX128,
            fee_growth_inside1_last_x128: value.feeGrowthInside1LastX128,
            tokens_owed0: value.tokensOwed0,
            tokens_owed1: value.tokensOwed1,
        }
    }
}

/// One consolidated row per owned position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub token_id: U256,
    pub asset0: AssetMetadata,
    pub asset1: AssetMetadata,
    pub fee_tier: u32,
    /// Derived, never checked against the factory's `getPool`
    pub pool_id: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub fee_growth_inside0_last_x128: U256,
    pub fee_growth_inside1_last_x128: U256,
    pub tokens_owed0: u128,
    pub tokens_owed1: u128,
    pub current_sqrt_price_x96: U160,
    pub current_tick: i32,
}

impl PositionRecord {
    /// Whether the pool's live tick sits inside `[tick_lower, tick_upper)`
    pub fn in_range(&self) -> bool {
        self.current_tick >= self.tick_lower && self.current_tick < self.tick_upper
    }

    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.asset0.symbol, self.asset1.symbol)
    }

    /// Tick spacing of the position's fee tier, if the tier is known
    pub fn tick_spacing(&self) -> Option<i32> {
        FeeTier::from_raw(self.fee_tier).map(|tier| tier.tick_spacing())
    }
}

// ============================================
// SETTINGS
// ============================================

/// Registry identities bound into an aggregator at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LensSettings {
    pub factory: Address,
    pub pool_init_code_hash: B256,
    pub max_concurrency: usize,
}

impl Default for LensSettings {
    fn default() -> Self {
        Self {
            factory: UNISWAP_V3_FACTORY,
            pool_init_code_hash: UNISWAP_V3_POOL_INIT_CODE_HASH,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(token0: Address, token1: Address) -> RawPosition {
        RawPosition {
            token0,
            token1,
            fee: 3000,
            tick_lower: -120,
            tick_upper: 120,
            liquidity: 42,
            fee_growth_inside0_last_x128: U256::from(7u64),
            fee_growth_inside1_last_x128: U256::from(9u64),
            tokens_owed0: 1,
            tokens_owed1: 2,
        }
    }

    #[test]
    fn test_fee_tier_round_trip_and_display() {
        for tier in FeeTier::ALL {
            assert_eq!(FeeTier::from_raw(tier.raw()), Some(tier));
        }
        assert_eq!(FeeTier::from_raw(2500), None);
        assert_eq!(FeeTier::Medium.to_string(), "0.30%");
        assert_eq!(FeeTier::Lowest.to_string(), "0.01%");
        assert_eq!(FeeTier::High.tick_spacing(), 200);
        assert_eq!(describe_fee(2500), "2500 (unrecognized)");
    }

    #[test]
    fn test_canonicalized_swaps_paired_fields() {
        let low = address!("0000000000000000000000000000000000000001");
        let high = address!("0000000000000000000000000000000000000002");

        let ordered = raw(low, high);
        assert!(ordered.is_canonical());
        assert_eq!(ordered.clone().canonicalized(), ordered);

        let flipped = raw(high, low).canonicalized();
        assert_eq!(flipped.token0, low);
        assert_eq!(flipped.token1, high);
        assert_eq!(flipped.fee_growth_inside0_last_x128, U256::from(9u64));
        assert_eq!(flipped.fee_growth_inside1_last_x128, U256::from(7u64));
        assert_eq!(flipped.tokens_owed0, 2);
        assert_eq!(flipped.tokens_owed1, 1);
        assert_eq!(flipped.liquidity, 42);
        assert_eq!(flipped.tick_lower, -120);
    }
}
