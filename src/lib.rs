#![doc(test(attr(deny(warnings))))]

//! Cost Summary fetches monthly billing data for a set of linked accounts,
//! computes month-over-month and multi-month trend signals, and renders a
//! console report highlighting accounts with significant cost increases.

pub mod billing;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod report;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Cost Summary tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
