//! Pool address derivation
//!
//! Uniswap V3 pools are deployed with CREATE2 by the factory, so a pool's
//! address follows from (factory, token0, token1, fee) and the pool's
//! init-code hash. No `getPool` lookup needed.

use alloy_primitives::{aliases::U24, keccak256, Address, B256};
use alloy_sol_types::{sol, SolValue};

sol! {
    /// Salt preimage, `abi.encode(token0, token1, fee)`
    struct PoolSalt {
        address token0;
        address token1;
        uint24 fee;
    }
}

/// Canonically ordered pool key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub token0: Address,
    pub token1: Address,
    pub fee: U24,
}

impl PoolKey {
    pub fn new(asset_a: Address, asset_b: Address, fee: U24) -> Self {
        let (token0, token1) = sort_assets(asset_a, asset_b);
        Self { token0, token1, fee }
    }

    pub fn salt(&self) -> B256 {
        keccak256(self.salt_preimage())
    }

    fn salt_preimage(&self) -> Vec<u8> {
        PoolSalt {
            token0: self.token0,
            token1: self.token1,
            fee: self.fee,
        }
        .abi_encode()
    }

    pub fn pool_address(&self, factory: Address, init_code_hash: B256) -> Address {
        factory.create2(self.salt(), init_code_hash)
    }
}

/// Lower address first
pub fn sort_assets(asset_a: Address, asset_b: Address) -> (Address, Address) {
    if asset_a < asset_b {
        (asset_a, asset_b)
    } else {
        (asset_b, asset_a)
    }
}

/// Derives the pool for an unordered asset pair.
///
/// Equal assets are not rejected; they yield an address no pool lives at.
pub fn derive_pool_identity(
    factory: Address,
    init_code_hash: B256,
    asset_a: Address,
    asset_b: Address,
    fee: U24,
) -> Address {
    PoolKey::new(asset_a, asset_b, fee).pool_address(factory, init_code_hash)
}
