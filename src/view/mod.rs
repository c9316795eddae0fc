//! Helpers for a render driver
//!
//! Nothing here draws. [`DisplayLayout`] sizes a plot of the Keplerian
//! model and [`Viewport`] maps N-body positions in meters to window pixels.
//! Zoom lives here and never reaches the physics.

use nalgebra::Point2;

use crate::celestial::CelestialBody;
use crate::kepler::KeplerModel;
use crate::nbody::OrbitTrail;
use crate::{OrreryError, Result};

/// Axis margin around the widest orbit
const AXIS_MARGIN: f64 = 1.2;
/// Largest planet diameter maps to this marker size
const LARGEST_MARKER: f64 = 10.0;
/// Star reduction factor used for the plotted star marker
const PLOT_STAR_REDUCTION: f64 = 25.0;
/// Opacity of the dashed orbit paths
const ORBIT_ALPHA: f64 = 0.3;
/// Zoom change per key press
const ZOOM_STEP: f64 = 1.1;

/// Plot extents and marker scale for a Keplerian model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayLayout {
    /// Both axes span `[-axis_limit, axis_limit]` AU
    pub axis_limit: f64,
    /// Diameter in km per unit of marker size
    pub size_scale: f64,
}

impl DisplayLayout {
    /// Fit the plot to the widest orbit and the largest planet
    pub fn for_model(model: &KeplerModel) -> Result<Self> {
        let planets = || model.bodies().iter().map(|(_, b)| b).filter(|b| b.is_planet());

        let widest = planets()
            .filter_map(|b| b.planet_orbit().map(|o| o.semi_major_axis))
            .fold(None, |acc: Option<f64>, a| Some(acc.map_or(a, |m| m.max(a))))
            .ok_or_else(|| OrreryError::InvalidParameter("no planets to lay out".to_string()))?;
        let largest = planets()
            .filter_map(|b| b.diameter_km)
            .fold(0.0_f64, f64::max);

        Ok(Self {
            axis_limit: widest * AXIS_MARGIN,
            size_scale: if largest > 0.0 { largest / LARGEST_MARKER } else { 1.0 },
        })
    }

    /// Marker size of a body on this plot
    pub fn marker_size(&self, body: &CelestialBody) -> f64 {
        body.scaled_size_with_reduction(self.size_scale, PLOT_STAR_REDUCTION)
    }

    /// RGBA color of a body's dashed orbit path
    pub fn orbit_rgba(&self, body: &CelestialBody) -> [f64; 4] {
        body.color.to_rgba(ORBIT_ALPHA)
    }
}

/// Window mapping for the N-body model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    /// Pixels per meter at zoom 1
    pub scale: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            // 1.5e11 m is 100 pixels
            scale: 100.0 / 1.5e11,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn zoom_in(&mut self) {
        self.zoom *= ZOOM_STEP;
    }

    pub fn zoom_out(&mut self) {
        self.zoom /= ZOOM_STEP;
    }

    /// Pixel coordinates of a position in meters, origin at the window center
    pub fn to_screen(&self, position: Point2<f64>) -> (i32, i32) {
        let half_w = f64::from(self.width / 2);
        let half_h = f64::from(self.height / 2);
        (
            (position.x * self.scale * self.zoom + half_w) as i32,
            (position.y * self.scale * self.zoom + half_h) as i32,
        )
    }

    /// Marker radius in pixels, never below one
    pub fn marker_radius(&self, radius: f64) -> i32 {
        ((radius * self.zoom) as i32).max(1)
    }

    /// Trail as a pixel polyline, or `None` while it is too short to draw
    pub fn trail_polyline(&self, trail: &OrbitTrail) -> Option<Vec<(i32, i32)>> {
        if trail.len() <= 2 {
            return None;
        }
        Some(trail.iter().map(|p| self.to_screen(*p)).collect())
    }
}
