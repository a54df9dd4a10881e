//! Valuation providers

pub mod dexscreener;

// Re-export for convenience
pub use dexscreener::DexScreenerProvider;
