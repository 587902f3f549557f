//! Opt-in tracing setup for hosts embedding `chart-scene`.
//!
//! The crate only emits `tracing` events. Hosts call one of these helpers or
//! install their own subscriber.

/// Installs a compact fmt subscriber filtered by `RUST_LOG`, falling back
/// to `info`.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter("info")
}

/// Like [`init_default_tracing`], with `fallback_filter` used when
/// `RUST_LOG` is unset or invalid (e.g. `"chart_scene=trace"` to see every
/// series phase).
#[must_use]
pub fn init_tracing_with_filter(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_filter));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}

#[cfg(test)]
mod tests {
    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn disabled_feature_installs_nothing() {
        assert!(!super::init_default_tracing());
    }
}
