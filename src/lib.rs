//! Orrery: a simplified solar system in motion
//!
//! This crate computes body positions for an animated solar system using one
//! of two models:
//!
//! - [`kepler::KeplerModel`]: planets on fixed ellipses and moons on circular
//!   offsets, each position a pure function of the frame index.
//! - [`nbody::NBodySystem`]: pairwise Newtonian gravity advanced by a fixed
//!   step explicit Euler integrator, with a trail of past positions per body.
//!
//! Both implement [`PositionProvider`], which is all a render loop needs.
//!
//! ```rust
//! use orrery::presets;
//! use orrery::PositionProvider;
//!
//! let mut model = presets::inner_solar_system().unwrap();
//! let frame = model.advance().unwrap();
//! assert!(frame.get("Earth").is_some());
//! ```

use thiserror::Error;

pub mod celestial;
pub mod constants;
pub mod kepler;
pub mod nbody;
pub mod presets;
pub mod registry;
pub mod view;

// Re-export commonly used types
pub use celestial::{BodyId, BodyPosition, CelestialBody, Color, FramePositions, PositionProvider};
pub use kepler::{orbit_curve, KeplerConfig, KeplerModel};
pub use nbody::{Body, NBodyConfig, NBodySystem};
pub use registry::Registry;

/// Main error type for the orrery library
///
/// Variants fall into two classes: domain errors (degenerate geometry met
/// while integrating) and configuration errors (a body table that violates
/// the model's invariants). Both are terminal for a run.
#[derive(Debug, Error)]
pub enum OrreryError {
    #[error("Degenerate geometry: {body} and {other} are at the same position")]
    CoincidentBodies { body: String, other: String },

    #[error("Non-finite state for {body} after integration step")]
    NonFiniteState { body: String },

    #[error("Invalid eccentricity {eccentricity} for {name}: must lie in [0, 1)")]
    InvalidEccentricity { name: String, eccentricity: f64 },

    #[error("Body not found: {0}")]
    UnknownBody(String),

    #[error("{body} references {parent}, which is not in the registry")]
    UnknownParent { body: String, parent: String },

    #[error("{name} is not a {expected}")]
    WrongKind { name: String, expected: &'static str },

    #[error("Duplicate body name: {0}")]
    DuplicateName(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl OrreryError {
    /// True for errors raised by degenerate geometry during force computation
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            OrreryError::CoincidentBodies { .. } | OrreryError::NonFiniteState { .. }
        )
    }

    /// True for errors raised by an invalid body table
    pub fn is_configuration(&self) -> bool {
        !self.is_domain()
    }
}

/// Result type for orrery operations
pub type Result<T> = std::result::Result<T, OrreryError>;
