//! Rendering of aggregated positions
//!
//! Values are printed raw. No amounts or prices are derived from them.

use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use console::style;
use eyre::Result;
use serde::{Deserialize, Serialize};

use crate::lens::{describe_fee, PositionRecord};

/// Everything one `list_positions` call returned, stamped with read time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionReport {
    pub owner: Address,
    pub chain_id: u64,
    pub fetched_at: DateTime<Utc>,
    pub positions: Vec<PositionRecord>,
}

impl PositionReport {
    pub fn new(owner: Address, chain_id: u64, positions: Vec<PositionRecord>) -> Self {
        Self {
            owner,
            chain_id,
            fetched_at: Utc::now(),
            positions,
        }
    }

    pub fn in_range_count(&self) -> usize {
        self.positions.iter().filter(|p| p.in_range()).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn print_table(&self) {
        println!();
        println!(
            "{}",
            style(format!("═══ POSITIONS OF {} ═══", self.owner)).cyan().bold()
        );
        println!();

        if self.positions.is_empty() {
            println!("{}", style("No positions held.").dim());
            return;
        }

        for record in &self.positions {
            let range = if record.in_range() {
                style("IN RANGE").green()
            } else {
                style("OUT OF RANGE").yellow()
            };

            println!(
                "{} #{} {} {} {}",
                style("●").cyan(),
                record.token_id,
                style(record.pair_label()).bold(),
                describe_fee(record.fee_tier),
                range
            );
            println!("   Pool:        {}", record.pool_id);
            if let Some(spacing) = record.tick_spacing() {
                println!("   Spacing:     {}", spacing);
            }
            println!(
                "   Ticks:       [{}, {})  current {}",
                record.tick_lower, record.tick_upper, record.current_tick
            );
            println!("   sqrtPriceX96: {}", record.current_sqrt_price_x96);
            println!("   Liquidity:   {}", record.liquidity);
            println!(
                "   Owed:        {} {} / {} {}",
                record.tokens_owed0, record.asset0.symbol, record.tokens_owed1, record.asset1.symbol
            );
            println!();
        }

        println!(
            "{} {} positions, {} in range (read at {})",
            style("✓").green(),
            self.positions.len(),
            self.in_range_count(),
            self.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
}
