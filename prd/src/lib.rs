//! Validation, recovery, and merge-forward for agent-maintained task lists.
//!
//! A requirements document (`prd.json` / `prd.yaml`) is a flat list of tasks an
//! unattended coding agent reads and rewrites. Rewrites are unreliable, so the
//! crate is built around never losing a completed task:
//!
//! - **[`core`]**: Pure, deterministic logic (validation, extraction, recovery,
//!   merge, bootstrap template). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (document read/write, backups,
//!   `@{path}` expansion, configuration).
//!
//! [`repair`] composes both into the validate → recover → restore → bootstrap
//! flow used by the `prd fix` command.

pub mod core;
pub mod entry;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod repair;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
