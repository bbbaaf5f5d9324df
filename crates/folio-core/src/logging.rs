#![forbid(unsafe_code)]

//! Logging support.
//!
//! Call sites use `crate::logging::{debug, warn, ...}` unconditionally. With the
//! `tracing` feature these are the real `tracing` macros; without it they
//! expand to nothing, so the crate carries no logging cost by default.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

// The no-op macros live at the crate root; a path import keeps `warn` from
// resolving to the built-in attribute.
#[cfg(not(feature = "tracing"))]
pub(crate) use crate::{debug, info, trace, warn};

#[cfg(test)]
mod tests {
    use super::{debug, info, trace, warn};

    #[test]
    fn macros_accept_structured_fields() {
        let element = 7_u32;
        let error = "quota exceeded";
        trace!(element, "traced");
        debug!(%element, "debugged");
        info!(count = 2, "informed");
        warn!(error = %error, "warned");
        assert_eq!((element, error), (7, "quota exceeded"));
    }
}
