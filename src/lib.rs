#![doc(test(attr(deny(warnings))))]

//! Customer desk captures customer records through a step-by-step wizard,
//! submits them to a REST backend and browses the stored records from a
//! terminal shell.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod notify;
pub mod screens;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Customer desk tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
