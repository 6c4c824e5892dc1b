//! Types shared between the setup engine and the command line front end.

pub mod config;
pub mod error;
pub mod macros;
pub mod secret;

#[doc(hidden)]
pub use tracing;

/// Target used by [`success!`] so the terminal formatter can tell a finished
/// step apart from a plain informational line.
pub const SUCCESS_TARGET: &str = "proxyup::success";

/// Target used for raw, prefix-less terminal lines.
pub const PRINT_TARGET: &str = "proxyup::print";
