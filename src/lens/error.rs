use alloy_primitives::Address;

/// Which ERC-20 metadata getter failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    Name,
    Symbol,
    Decimals,
}

impl std::fmt::Display for MetadataField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetadataField::Name => write!(f, "name()"),
            MetadataField::Symbol => write!(f, "symbol()"),
            MetadataField::Decimals => write!(f, "decimals()"),
        }
    }
}

/// A failed external read. Every variant names the identifier it was made for.
///
/// A degenerate pool derivation (both assets equal) has no variant of its own:
/// the derived pool does not exist, so it surfaces as [`LensError::PoolState`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LensError {
    #[error("position registry `{call}` failed for {subject}: {reason}")]
    PositionRegistry {
        call: &'static str,
        subject: String,
        reason: String,
    },

    #[error("slot0() failed for pool {pool}: {reason}")]
    PoolState { pool: Address, reason: String },

    #[error("{field} failed for asset {asset}: {reason}")]
    AssetMetadata {
        asset: Address,
        field: MetadataField,
        reason: String,
    },
}

impl LensError {
    /// The identifier the failed read was issued for
    pub fn subject(&self) -> String {
        match self {
            LensError::PositionRegistry { subject, .. } => subject.clone(),
            LensError::PoolState { pool, .. } => pool.to_string(),
            LensError::AssetMetadata { asset, .. } => asset.to_string(),
        }
    }
}
