//! Logging shorthands routed through `tracing`.
//!
//! Library code reports progress with these instead of writing to stdout so
//! that the front end decides how (and whether) anything is rendered.

#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        $crate::tracing::info!(target: $crate::SUCCESS_TARGET, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::tracing::info!($($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::tracing::warn!($($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::tracing::error!($($arg)+)
    };
}
