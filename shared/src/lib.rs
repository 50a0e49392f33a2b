//! Background scroll engine for Spiral Tower floors.
//!
//! Everything here is pure: the browser glue in `spiral-client` feeds in
//! measurements and timestamps and writes the results back to the page.

pub mod animation;
pub mod arrows;
pub mod bounds;
pub mod config;
pub mod error;
pub mod events;
pub mod fit;
pub mod geometry;
pub mod markers;
pub mod overflow;
pub mod pan;
pub mod transform;

pub use arrows::ArrowState;
pub use config::ScrollConfig;
pub use error::FitError;
pub use events::*;
pub use fit::ViewportFitState;
pub use geometry::*;
pub use markers::{MarkerAnchor, MarkerPlacement, MarkerSynchronizer};
pub use pan::{FrameOutcome, PanController, PanOutcome, PanPhase};
pub use transform::{AffineTransform, parse_transform};
