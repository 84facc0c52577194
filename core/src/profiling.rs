//! Tracy instrumentation.
//!
//! Build with the `profiling` feature to connect to a Tracy client:
//!
//! ```bash
//! cargo run -p dimshift-demos --bin flip_demo --features profiling
//! ```
//!
//! Without the feature every macro expands to nothing (or just evaluates
//! its value argument), so instrumented hot paths cost nothing.
//!
//! ```ignore
//! fn trace_loops(raster: &Raster) -> Vec<Vec<Vec2>> {
//!     dimshift_core::profile_function!();
//!     // ...
//! }
//!
//! // once per simulated frame in a driver loop
//! dimshift_core::profile_frame!();
//! dimshift_core::profile_plot!("converted_per_tick", converted);
//! ```

#[cfg(feature = "profiling")]
#[doc(hidden)]
pub use tracy_client;

/// Span named `$name`, closed at the end of the enclosing scope.
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        let _dimshift_span = $crate::profiling::tracy_client::span!($name);
    };
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Span named after the enclosing function.
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_function {
    () => {
        let _dimshift_span = $crate::profiling::tracy_client::span!();
    };
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_function {
    () => {};
}

/// Mark the end of a frame. Frame-spread sweeps show up one tick per frame.
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_frame {
    () => {
        if let Some(client) = $crate::profiling::tracy_client::Client::running() {
            client.frame_mark();
        }
    };
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_frame {
    () => {};
}

/// Plot a numeric value against time.
#[cfg(feature = "profiling")]
#[macro_export]
macro_rules! profile_plot {
    ($name:literal, $value:expr) => {
        $crate::profiling::tracy_client::plot!($name, $value as f64);
    };
}

#[cfg(not(feature = "profiling"))]
#[macro_export]
macro_rules! profile_plot {
    ($name:literal, $value:expr) => {
        let _ = $value;
    };
}
