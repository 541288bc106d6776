//! Diagnostic tool - Check configuration status
//!
//! Run with: cargo run --bin diagnose

use std::env;

/// Keeps long URLs (often carrying an API key) readable, cutting on chars
fn shorten_url(url: &str) -> String {
    let len = url.chars().count();
    if len <= 50 {
        return url.to_string();
    }
    let head: String = url.chars().take(30).collect();
    let tail: String = url.chars().skip(len - 15).collect();
    format!("{}...{}", head, tail)
}

fn main() {
    println!("🔍 POSITION LENS DIAGNOSTIC CHECK\n");

    // Load .env
    dotenvy::dotenv().ok();

    println!("═══════════════════════════════════════════════════");
    println!("                  CONFIGURATION                     ");
    println!("═══════════════════════════════════════════════════\n");

    let checks = [
        ("CHAIN_ID", "1", "Chain the registries live on"),
        (
            "POSITION_MANAGER",
            "0xC36442b4a4522E871399CD717aBDD847Ab11FE88",
            "Position registry (NonfungiblePositionManager)",
        ),
        (
            "POOL_FACTORY",
            "0x1F98431c8aD98523631AE4a59f267346ea31F984",
            "Factory used for pool address derivation",
        ),
        (
            "POOL_INIT_CODE_HASH",
            "0xe34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54",
            "Pool creation code hash",
        ),
        ("MAX_CONCURRENT_POSITIONS", "8", "Positions read in parallel"),
        ("OUTPUT_FORMAT", "table", "table or json"),
    ];

    for (key, default, desc) in checks {
        let value = env::var(key).unwrap_or_else(|_| default.to_string());
        let marker = if env::var(key).is_err() { "(default)" } else { "(from .env)" };
        println!("  {}: {} {}", key, value, marker);
        println!("    └─ {}\n", desc);
    }

    let rpc = env::var("RPC_URL").unwrap_or_else(|_| "NOT SET".to_string());
    println!("  RPC_URL: {}", shorten_url(&rpc));

    println!("\n═══════════════════════════════════════════════════");
    println!("                     STATUS                         ");
    println!("═══════════════════════════════════════════════════\n");

    if env::var("RPC_URL").is_err() {
        println!("  ⚠️  RPC_URL not set, the public endpoint will be used (may be slow)");
    }

    let custom_registry = env::var("POSITION_MANAGER").is_ok() || env::var("POOL_FACTORY").is_ok();
    if custom_registry && env::var("POOL_INIT_CODE_HASH").is_err() {
        println!("  ⚠️  Custom registries with the default init code hash:");
        println!("     derived pool addresses will be wrong unless the pools");
        println!("     share Uniswap V3's creation code.");
    }

    println!("\n✅ Diagnostic complete!\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url_is_untouched() {
        assert_eq!(shorten_url("http://localhost:8545"), "http://localhost:8545");
    }

    #[test]
    fn test_long_url_is_cut_on_char_boundaries() {
        let url = format!("https://rpc.example/{}/ключ-доступа-ключ", "é".repeat(20));
        let shown = shorten_url(&url);

        assert!(shown.starts_with("https://rpc.example/éééééééééé..."));
        assert!(shown.ends_with("...юч-доступа-ключ"));
        assert_eq!(shown.chars().count(), 30 + 3 + 15);
    }
}
