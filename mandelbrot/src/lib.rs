//! Escape-time Mandelbrot grids
//!
//! Provides:
//! - Point and grid evaluation of the escape-time recurrence
//! - Lazy threshold-sweep frame sequences for animation
//! - Colour mapping with PNG and GIF output

pub mod cancel;
pub mod config;
pub mod error;
pub mod frames;
pub mod grid;
pub mod point;
pub mod region;
pub mod render;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use cancel::Cancellation;
pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use frames::{frames, CapSchedule, Frame, FrameSequence};
pub use grid::{evaluate_grid, evaluate_grid_with, CoordinateGrid, EscapeGrid, Grid};
pub use point::{escape_time, evaluate, ESCAPE_RADIUS};
pub use region::{linspace, meshgrid, Region};
pub use render::{save_image, stream, AnimationWriter, FrameSink, Palette, RenderContext};

/// Initialize tracing/logging with the given filter level
pub fn init_tracing(filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
