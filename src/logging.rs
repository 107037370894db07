// Events go through `tracing` when `with-tracing` is enabled and compile away
// otherwise; the arguments are still type-checked in both builds.

macro_rules! spf_debug {
    ($($arg:tt)*) => {{
        #[cfg(feature = "with-tracing")]
        {
            tracing::debug!($($arg)*);
        }
        #[cfg(not(feature = "with-tracing"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}

macro_rules! spf_warn {
    ($($arg:tt)*) => {{
        #[cfg(feature = "with-tracing")]
        {
            tracing::warn!($($arg)*);
        }
        #[cfg(not(feature = "with-tracing"))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}
