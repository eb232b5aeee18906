#![allow(dead_code)]
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests. Call this once at the start of any test that needs logging.
/// Safe to call multiple times - will only initialize once across the entire test suite.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .is_test(true)
            .filter_level(log::LevelFilter::Trace)
            .format_target(true)
            .format_module_path(false)
            .try_init();
    });
}

pub const COMMUTO_SWAP_ABI: &str = include_str!("artifacts/commuto_swap.abi.json");

/// ABI word for a small number, as hex.
pub fn word(n: u64) -> String {
    format!("{:064x}", n)
}
