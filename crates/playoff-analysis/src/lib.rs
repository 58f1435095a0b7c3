// Library root: re-exports all modules so integration tests and the binary
// share the same public API.

pub mod analysis;
pub mod config;
pub mod data;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod stats;
