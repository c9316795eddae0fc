//! Celestial body definitions shared by the orbit models
//!
//! A [`CelestialBody`] is a star, a planet or a moon. The kind-specific
//! attributes live in [`BodyKind`]; references to other bodies are
//! [`BodyId`] handles into the owning [`Registry`](crate::registry::Registry),
//! never owned values.

use nalgebra::Point2;
use serde::Serialize;

use crate::constants::STAR_REDUCTION_FACTOR;
use crate::registry::{Named, Satellite};
use crate::Result;

mod color;

pub use color::Color;

/// Handle to a body stored in a registry
///
/// Handles are only minted by [`Registry::insert`](crate::registry::Registry::insert)
/// and index the registry in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    /// Position of the body in its registry's insertion order
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Fixed elliptical orbit of a planet around a star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetOrbit {
    /// Star at the focus of the ellipse
    pub star: BodyId,
    /// Semi-major axis in AU
    pub semi_major_axis: f64,
    /// Eccentricity, in [0, 1)
    pub eccentricity: f64,
    /// Orbital period in years
    pub period: f64,
}

/// Fixed circular orbit of a moon around a planet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonOrbit {
    /// Planet the moon circles
    pub planet: BodyId,
    /// Distance from the planet's center in AU
    pub orbit_radius: f64,
    /// Angular speed in radians per unit of simulated time
    pub angular_speed: f64,
}

/// What kind of body this is, with its kind-specific attributes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    Star { mass_kg: f64 },
    Planet(PlanetOrbit),
    Moon(MoonOrbit),
}

/// A body of the Keplerian model
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    /// Unique name of the body
    pub name: String,
    /// Marker size used when no physical diameter is known
    pub display_size: f64,
    /// Physical diameter in kilometers, if known
    pub diameter_km: Option<f64>,
    /// Display color
    pub color: Color,
    /// Star, planet or moon attributes
    pub kind: BodyKind,
}

impl CelestialBody {
    /// Create a star
    pub fn star(name: &str, display_size: f64, mass_kg: f64) -> Self {
        Self::with_kind(name, display_size, Color::YELLOW, BodyKind::Star { mass_kg })
    }

    /// Create a planet on the given orbit
    pub fn planet(name: &str, display_size: f64, orbit: PlanetOrbit) -> Self {
        Self::with_kind(name, display_size, Color::WHITE, BodyKind::Planet(orbit))
    }

    /// Create a moon on the given orbit
    pub fn moon(name: &str, display_size: f64, orbit: MoonOrbit) -> Self {
        Self::with_kind(name, display_size, Color::GRAY, BodyKind::Moon(orbit))
    }

    fn with_kind(name: &str, display_size: f64, color: Color, kind: BodyKind) -> Self {
        Self {
            name: name.to_string(),
            display_size,
            diameter_km: None,
            color,
            kind,
        }
    }

    /// Set the physical diameter in kilometers
    pub fn with_diameter_km(mut self, diameter_km: f64) -> Self {
        self.diameter_km = Some(diameter_km);
        self
    }

    /// Set the display color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Parse and set the display color from a name or `#RRGGBB` string
    pub fn with_color_str(self, color: &str) -> Result<Self> {
        Ok(self.with_color(color.parse()?))
    }

    /// Marker size for a given diameter scale factor
    ///
    /// Stars are further divided by the default star reduction factor so
    /// they don't swamp the planets.
    pub fn scaled_size(&self, scale_factor: f64) -> f64 {
        self.scaled_size_with_reduction(scale_factor, STAR_REDUCTION_FACTOR)
    }

    /// Marker size with an explicit star reduction factor
    ///
    /// The reduction only applies to stars. A missing or zero diameter
    /// falls back to `display_size`.
    pub fn scaled_size_with_reduction(&self, scale_factor: f64, star_reduction_factor: f64) -> f64 {
        match self.diameter_km.filter(|d| *d != 0.0) {
            Some(diameter) if self.is_star() => diameter / (scale_factor * star_reduction_factor),
            Some(diameter) => diameter / scale_factor,
            None => self.display_size,
        }
    }

    pub fn is_star(&self) -> bool {
        matches!(self.kind, BodyKind::Star { .. })
    }

    pub fn is_planet(&self) -> bool {
        matches!(self.kind, BodyKind::Planet(_))
    }

    pub fn is_moon(&self) -> bool {
        matches!(self.kind, BodyKind::Moon(_))
    }

    /// Planet orbit, if this body is a planet
    pub fn planet_orbit(&self) -> Option<&PlanetOrbit> {
        match &self.kind {
            BodyKind::Planet(orbit) => Some(orbit),
            _ => None,
        }
    }

    /// Moon orbit, if this body is a moon
    pub fn moon_orbit(&self) -> Option<&MoonOrbit> {
        match &self.kind {
            BodyKind::Moon(orbit) => Some(orbit),
            _ => None,
        }
    }
}

impl Named for CelestialBody {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Satellite for CelestialBody {
    fn primary(&self) -> Option<BodyId> {
        self.moon_orbit().map(|orbit| orbit.planet)
    }
}

/// Position of one named body in a frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyPosition {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

impl BodyPosition {
    pub fn new(name: &str, position: Point2<f64>) -> Self {
        Self {
            name: name.to_string(),
            x: position.x,
            y: position.y,
        }
    }

    pub fn point(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }
}

/// Positions of every moving body after one frame, in registry order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FramePositions {
    /// Frame index (Keplerian) or tick count (N-body)
    pub frame: u64,
    /// Simulated time at this frame, in the model's own time unit
    pub time: f64,
    pub positions: Vec<BodyPosition>,
}

impl FramePositions {
    /// Position of a body by name
    pub fn get(&self, name: &str) -> Option<Point2<f64>> {
        self.positions
            .iter()
            .find(|p| p.name == name)
            .map(BodyPosition::point)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyPosition> {
        self.positions.iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A model that yields body positions once per animation tick
///
/// Implementations are driven by a render loop: one call per tick, each
/// returning before the next tick is scheduled.
pub trait PositionProvider {
    /// Advance by one frame and report where every moving body is
    fn advance(&mut self) -> Result<FramePositions>;
}
