//! N-body gravitational model
//!
//! Every body carries a position and velocity in SI units and is pulled by
//! every other body according to Newton's law of gravitation. Each tick
//! advances the system by one fixed step with explicit Euler integration:
//!
//! ```text
//! v += (ΣF / m) Δt
//! p += v Δt
//! ```
//!
//! Bodies are advanced one after another in registry order, and each one
//! reads the positions of the others as they are at that moment. A body
//! late in the order therefore sees bodies earlier in the order already
//! moved for the current tick.
//!
//! Moons are special: their parent pulls at full strength, every other body
//! is attenuated by [`NBodyConfig::moon_perturbation_divisor`], and a moon
//! flagged with a [`StarInfluence`] has the star's pull divided further.

use log::{debug, trace, warn};
use nalgebra::{Point2, Vector2};

use crate::celestial::{BodyId, BodyPosition, Color, FramePositions, PositionProvider};
use crate::constants::{G, MOON_LAUNCH_ANGLE, MOON_PERTURBATION_DIVISOR, NBODY_TIME_STEP_S};
use crate::registry::{Named, Registry, Satellite};
use crate::{OrreryError, Result};

mod trail;

pub use trail::OrbitTrail;

/// Parameters of the N-body model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NBodyConfig {
    /// Gravitational constant in m^3 kg^-1 s^-2
    pub gravitational_constant: f64,
    /// Integration step in seconds
    pub time_step_s: f64,
    /// Divisor applied to every non-parent pull on a moon
    pub moon_perturbation_divisor: f64,
    /// Maximum number of points kept per orbit trail; `None` keeps them all
    pub trail_capacity: Option<usize>,
}

impl Default for NBodyConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: G,
            time_step_s: NBODY_TIME_STEP_S,
            moon_perturbation_divisor: MOON_PERTURBATION_DIVISOR,
            trail_capacity: None,
        }
    }
}

impl NBodyConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the integration step in seconds
    pub fn with_time_step(mut self, time_step_s: f64) -> Self {
        self.time_step_s = time_step_s;
        self
    }

    /// Set the gravitational constant
    pub fn with_gravitational_constant(mut self, g: f64) -> Self {
        self.gravitational_constant = g;
        self
    }

    /// Set the divisor applied to non-parent pulls on moons
    pub fn with_moon_perturbation_divisor(mut self, divisor: f64) -> Self {
        self.moon_perturbation_divisor = divisor;
        self
    }

    /// Cap every orbit trail at `capacity` points
    pub fn with_trail_capacity(mut self, capacity: usize) -> Self {
        self.trail_capacity = Some(capacity);
        self
    }

    fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(OrreryError::InvalidParameter(format!(
                    "{} must be positive, got {}",
                    name, value
                )))
            }
        };
        positive("gravitational constant", self.gravitational_constant)?;
        positive("time step", self.time_step_s)?;
        positive("moon perturbation divisor", self.moon_perturbation_divisor)
    }
}

/// Extra attenuation of a star's pull on one particular moon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarInfluence {
    /// The star whose pull is reduced
    pub star: BodyId,
    /// Divisor applied before the moon perturbation divisor
    pub divisor: f64,
}

/// Link from a moon to the body it circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonBinding {
    /// Body whose pull acts on the moon at full strength
    pub parent: BodyId,
    /// Distance from the parent at launch, in meters
    pub distance: f64,
    /// Reduced pull of the star, for the home planet's moon
    pub reduced_star_influence: Option<StarInfluence>,
}

/// A body of the N-body model
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    /// Position in meters
    pub position: Point2<f64>,
    /// Velocity in m/s
    pub velocity: Vector2<f64>,
    /// Marker radius in pixels
    pub radius: f64,
    pub color: Color,
    /// Mass in kilograms
    pub mass: f64,
    trail: OrbitTrail,
    moon: Option<MoonBinding>,
}

impl Body {
    /// Create a free body
    pub fn new(
        name: &str,
        position: Point2<f64>,
        velocity: Vector2<f64>,
        radius: f64,
        color: Color,
        mass: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            position,
            velocity,
            radius,
            color,
            mass,
            trail: OrbitTrail::unbounded(),
            moon: None,
        }
    }

    /// Positions recorded after each tick
    pub fn trail(&self) -> &OrbitTrail {
        &self.trail
    }

    /// Moon binding, if this body is a moon
    pub fn moon(&self) -> Option<&MoonBinding> {
        self.moon.as_ref()
    }

    fn is_finite(&self) -> bool {
        is_finite_state(&self.position, &self.velocity)
    }
}

fn is_finite_state(position: &Point2<f64>, velocity: &Vector2<f64>) -> bool {
    position.iter().chain(velocity.iter()).all(|v| v.is_finite())
}

impl Named for Body {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Satellite for Body {
    fn primary(&self) -> Option<BodyId> {
        self.moon.map(|binding| binding.parent)
    }
}

/// A set of mutually attracting bodies advanced with a fixed step
#[derive(Debug, Clone)]
pub struct NBodySystem {
    bodies: Registry<Body>,
    config: NBodyConfig,
    ticks: u64,
    trail_evicting: bool,
}

impl NBodySystem {
    /// Create an empty system
    pub fn new(config: NBodyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            bodies: Registry::new(),
            config,
            ticks: 0,
            trail_evicting: false,
        })
    }

    pub fn config(&self) -> &NBodyConfig {
        &self.config
    }

    /// Add a free body
    ///
    /// The mass must be positive and the initial state finite.
    pub fn add_body(&mut self, mut body: Body) -> Result<BodyId> {
        if !(body.mass.is_finite() && body.mass > 0.0) {
            return Err(OrreryError::InvalidParameter(format!(
                "{} must have a positive mass, got {}",
                body.name, body.mass
            )));
        }
        if !body.is_finite() {
            return Err(OrreryError::InvalidParameter(format!(
                "{} has a non-finite initial state",
                body.name
            )));
        }

        body.trail = match self.config.trail_capacity {
            Some(capacity) => OrbitTrail::with_capacity(capacity),
            None => OrbitTrail::unbounded(),
        };
        debug!(
            "added {} at ({:e}, {:e}) m, mass {:e} kg",
            body.name, body.position.x, body.position.y, body.mass
        );
        self.bodies.insert(body)
    }

    /// Add a moon on a circular launch around `parent`
    ///
    /// The moon starts `distance` meters above its parent (at angle π/2)
    /// moving at the circular speed `sqrt(G m_parent / distance)`
    /// perpendicular to the radius. The parent's own velocity is not added.
    pub fn add_moon(
        &mut self,
        name: &str,
        parent: BodyId,
        distance: f64,
        radius: f64,
        color: Color,
        mass: f64,
    ) -> Result<BodyId> {
        let parent_body = self.bodies.get(parent).ok_or_else(|| OrreryError::UnknownParent {
            body: name.to_string(),
            parent: format!("body #{}", parent.index()),
        })?;
        if !(distance.is_finite() && distance > 0.0) {
            return Err(OrreryError::InvalidParameter(format!(
                "{} must start at a positive distance from {}, got {}",
                name, parent_body.name, distance
            )));
        }

        let angle = MOON_LAUNCH_ANGLE;
        let position = parent_body.position + Vector2::new(angle.cos(), angle.sin()) * distance;
        let speed = (self.config.gravitational_constant * parent_body.mass / distance).sqrt();
        let velocity = Vector2::new(-speed * angle.sin(), speed * angle.cos());

        let mut moon = Body::new(name, position, velocity, radius, color, mass);
        moon.moon = Some(MoonBinding {
            parent,
            distance,
            reduced_star_influence: None,
        });
        self.add_body(moon)
    }

    /// Divide `star`'s pull on `moon` by `divisor`, on top of the usual moon
    /// attenuation
    ///
    /// `star` must be a third body: neither the moon nor its parent.
    pub fn reduce_star_influence(
        &mut self,
        moon: BodyId,
        star: BodyId,
        divisor: f64,
    ) -> Result<()> {
        if !self.bodies.contains(star) {
            return Err(OrreryError::UnknownBody(format!("body #{}", star.index())));
        }
        if !(divisor.is_finite() && divisor > 0.0) {
            return Err(OrreryError::InvalidParameter(format!(
                "star influence divisor must be positive, got {}",
                divisor
            )));
        }

        let body = self
            .bodies
            .get_mut(moon)
            .ok_or_else(|| OrreryError::UnknownBody(format!("body #{}", moon.index())))?;
        let binding = body.moon.as_mut().ok_or_else(|| OrreryError::WrongKind {
            name: body.name.clone(),
            expected: "moon",
        })?;
        if star == moon || star == binding.parent {
            return Err(OrreryError::InvalidParameter(format!(
                "{} cannot reduce its own or its parent's influence",
                body.name
            )));
        }
        binding.reduced_star_influence = Some(StarInfluence { star, divisor });
        Ok(())
    }

    /// Gravitational pull of `other` on `body`, in newtons
    ///
    /// Fails if the two bodies share a position.
    pub fn gravitational_pull(&self, body: BodyId, other: BodyId) -> Result<Vector2<f64>> {
        let a = self.body_or_err(body)?;
        let b = self.body_or_err(other)?;

        let delta = b.position - a.position;
        let distance = delta.norm();
        if distance == 0.0 {
            return Err(OrreryError::CoincidentBodies {
                body: a.name.clone(),
                other: b.name.clone(),
            });
        }

        let force = self.config.gravitational_constant * a.mass * b.mass / distance.powi(2);
        let theta = delta.y.atan2(delta.x);
        Ok(Vector2::new(theta.cos() * force, theta.sin() * force))
    }

    /// Net force on a body given the current positions of all bodies
    pub fn net_force(&self, id: BodyId) -> Result<Vector2<f64>> {
        let body = self.body_or_err(id)?;
        let others = self.bodies.iter().map(|(other, _)| other).filter(|other| *other != id);

        let Some(binding) = body.moon else {
            return others.map(|other| self.gravitational_pull(id, other)).sum();
        };

        let mut total = Vector2::zeros();
        for other in others {
            let pull = self.gravitational_pull(id, other)?;
            if other == binding.parent {
                total += pull;
                continue;
            }
            let pull = match binding.reduced_star_influence {
                Some(influence) if influence.star == other => pull / influence.divisor,
                _ => pull,
            };
            total += pull / self.config.moon_perturbation_divisor;
        }
        Ok(total)
    }

    /// Advance every body by one time step
    ///
    /// On error the tick is abandoned part way: bodies earlier in the order
    /// have already moved, the failing body keeps its last finite state.
    /// Errors are terminal for the run.
    pub fn advance_tick(&mut self) -> Result<()> {
        let dt = self.config.time_step_s;

        for index in 0..self.bodies.len() {
            let id = BodyId(index);
            let force = self.net_force(id)?;

            let body = &mut self.bodies.as_mut_slice()[index];
            let velocity = body.velocity + force / body.mass * dt;
            let position = body.position + velocity * dt;
            if !is_finite_state(&position, &velocity) {
                return Err(OrreryError::NonFiniteState {
                    body: body.name.clone(),
                });
            }
            body.velocity = velocity;
            body.position = position;

            if body.trail.push(position) && !self.trail_evicting {
                warn!(
                    "orbit trail of {} reached its capacity, dropping oldest points",
                    body.name
                );
                self.trail_evicting = true;
            }
        }

        self.ticks += 1;
        trace!("tick {} done, t = {} s", self.ticks, self.elapsed_s());
        Ok(())
    }

    /// Number of ticks advanced so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds elapsed
    pub fn elapsed_s(&self) -> f64 {
        self.ticks as f64 * self.config.time_step_s
    }

    pub fn bodies(&self) -> &Registry<Body> {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    pub fn body_by_name(&self, name: &str) -> Option<&Body> {
        self.bodies.get_by_name(name)
    }

    fn body_or_err(&self, id: BodyId) -> Result<&Body> {
        self.bodies
            .get(id)
            .ok_or_else(|| OrreryError::UnknownBody(format!("body #{}", id.index())))
    }

    /// Current position of every body, in registry order
    pub fn snapshot(&self) -> FramePositions {
        FramePositions {
            frame: self.ticks,
            time: self.elapsed_s(),
            positions: self
                .bodies
                .iter()
                .map(|(_, body)| BodyPosition::new(&body.name, body.position))
                .collect(),
        }
    }
}

impl PositionProvider for NBodySystem {
    fn advance(&mut self) -> Result<FramePositions> {
        self.advance_tick()?;
        Ok(self.snapshot())
    }
}
