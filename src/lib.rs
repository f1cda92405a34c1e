// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod config;
pub mod error;
pub mod exam;
pub mod ledger;
pub mod normalize;
pub mod options;
pub mod runtime;
pub mod session;
pub mod session_log;
pub mod srqueue;
pub mod vocab;
