//! Stable exit codes for `prd` CLI commands.

/// Command succeeded (document valid, recovered, or restored).
pub const OK: i32 = 0;
/// Document invalid, unreadable, or the command failed.
pub const INVALID: i32 = 1;
/// `prd fix` gave up on automated repair and installed the bootstrap template.
pub const BOOTSTRAPPED: i32 = 2;
