/// Account holding an owner and an exact decimal balance, debited and
/// credited in place.
pub mod account;

/// Bank owning an ordered list of accounts and moving money between them.
pub mod bank;

/// Typed commands parsed from raw operation rows before they reach the model.
pub mod command;

/// Operation processor interface, plus "in memory" implementation backed by
/// a single [`bank::Bank`].
pub mod processor;

/// CSV front end for the processor, shared by the binary and the
/// integration tests.
pub mod bin_utils;
