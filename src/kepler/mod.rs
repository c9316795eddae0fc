//! Keplerian orbit model
//!
//! Planets ride fixed ellipses with the star at one focus and moons ride
//! fixed circles around their planet. Every position is a closed-form
//! function of simulated time, so the only state carried from one frame to
//! the next is the frame counter used by [`PositionProvider::advance`].
//!
//! # Orbit equation
//!
//! For semi-major axis `a` and eccentricity `e` the orbit in polar form is
//!
//! ```text
//! r(θ) = a (1 - e²) / (1 + e cos θ)
//! ```
//!
//! # Orbital angle
//!
//! The angle of a planet at simulated time `t` is taken as `θ = t / period`.
//! This is a linear stand-in for the true anomaly: there is no Kepler's
//! equation solve, and planets move at constant angular speed along their
//! ellipse.

use log::{debug, trace};
use nalgebra::Point2;

use crate::celestial::{
    BodyId, BodyKind, BodyPosition, CelestialBody, FramePositions, PositionProvider,
};
use crate::constants::{KEPLER_TIME_STEP, ORBIT_SAMPLES, TAU};
use crate::registry::Registry;
use crate::{OrreryError, Result};

/// Parameters of the Keplerian model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerConfig {
    /// Simulated time added per frame
    pub time_step: f64,
    /// Number of points sampled along a static orbit path
    pub orbit_samples: usize,
}

impl Default for KeplerConfig {
    fn default() -> Self {
        Self {
            time_step: KEPLER_TIME_STEP,
            orbit_samples: ORBIT_SAMPLES,
        }
    }
}

impl KeplerConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the simulated time added per frame
    pub fn with_time_step(mut self, time_step: f64) -> Self {
        self.time_step = time_step;
        self
    }

    /// Set the number of points sampled along a static orbit path
    pub fn with_orbit_samples(mut self, orbit_samples: usize) -> Self {
        self.orbit_samples = orbit_samples;
        self
    }
}

/// Orbital radius at angle `theta` on an ellipse with the focus at the origin
pub fn radius_at(semi_major_axis: f64, eccentricity: f64, theta: f64) -> f64 {
    semi_major_axis * (1.0 - eccentricity.powi(2)) / (1.0 + eccentricity * theta.cos())
}

/// Point at angle `theta` on an ellipse with the focus at the origin
fn ellipse_point(semi_major_axis: f64, eccentricity: f64, theta: f64) -> Point2<f64> {
    let r = radius_at(semi_major_axis, eccentricity, theta);
    Point2::new(r * theta.cos(), r * theta.sin())
}

fn check_eccentricity(name: &str, eccentricity: f64) -> Result<()> {
    if (0.0..1.0).contains(&eccentricity) {
        Ok(())
    } else {
        Err(OrreryError::InvalidEccentricity {
            name: name.to_string(),
            eccentricity,
        })
    }
}

/// Sample `samples` points of a full orbit
///
/// Angles are uniformly spaced over `[0, 2π]` with both endpoints included,
/// so the first and last points coincide. Fails if `eccentricity` is outside
/// `[0, 1)`.
///
/// ```rust
/// use orrery::orbit_curve;
///
/// let circle = orbit_curve(2.0, 0.0, 5).unwrap();
/// assert_eq!(circle.len(), 5);
/// assert!((circle[0].x - 2.0).abs() < 1e-12);
/// ```
pub fn orbit_curve(
    semi_major_axis: f64,
    eccentricity: f64,
    samples: usize,
) -> Result<Vec<Point2<f64>>> {
    check_eccentricity("orbit curve", eccentricity)?;

    let last = samples.saturating_sub(1).max(1) as f64;
    Ok((0..samples)
        .map(|i| {
            let theta = TAU * i as f64 / last;
            ellipse_point(semi_major_axis, eccentricity, theta)
        })
        .collect())
}

/// Closed-form model of planets on ellipses and moons on circles
#[derive(Debug, Clone)]
pub struct KeplerModel {
    bodies: Registry<CelestialBody>,
    config: KeplerConfig,
    /// Every planet, in registry order
    planets: Vec<BodyId>,
    /// Planets that have moons, each with its moons
    moons_by_planet: Vec<(BodyId, Vec<BodyId>)>,
    /// Frame index handed out by the next `advance` call
    next_frame: u64,
}

impl KeplerModel {
    /// Build a model over a validated body table
    ///
    /// Every planet must orbit a star of the same registry with an
    /// eccentricity in `[0, 1)` and a positive period. Every moon must orbit
    /// a planet of the same registry.
    pub fn new(bodies: Registry<CelestialBody>, config: KeplerConfig) -> Result<Self> {
        if !(config.time_step.is_finite() && config.time_step > 0.0) {
            return Err(OrreryError::InvalidParameter(format!(
                "time step must be positive, got {}",
                config.time_step
            )));
        }

        for (_, body) in bodies.iter() {
            match &body.kind {
                BodyKind::Star { .. } => {}
                BodyKind::Planet(orbit) => {
                    Self::check_parent(&bodies, body, orbit.star, CelestialBody::is_star, "star")?;
                    check_eccentricity(&body.name, orbit.eccentricity)?;
                    if !(orbit.period.is_finite() && orbit.period > 0.0) {
                        return Err(OrreryError::InvalidParameter(format!(
                            "{} has non-positive orbital period {}",
                            body.name, orbit.period
                        )));
                    }
                    if !(orbit.semi_major_axis.is_finite() && orbit.semi_major_axis > 0.0) {
                        return Err(OrreryError::InvalidParameter(format!(
                            "{} has non-positive semi-major axis {}",
                            body.name, orbit.semi_major_axis
                        )));
                    }
                }
                BodyKind::Moon(orbit) => {
                    Self::check_parent(
                        &bodies,
                        body,
                        orbit.planet,
                        CelestialBody::is_planet,
                        "planet",
                    )?;
                    if !(orbit.orbit_radius.is_finite() && orbit.angular_speed.is_finite()) {
                        return Err(OrreryError::InvalidParameter(format!(
                            "{} has a non-finite orbit",
                            body.name
                        )));
                    }
                }
            }
        }

        let planets: Vec<BodyId> = bodies
            .iter()
            .filter(|(_, body)| body.is_planet())
            .map(|(id, _)| id)
            .collect();
        let moons_by_planet: Vec<(BodyId, Vec<BodyId>)> = bodies
            .parents_with_satellites()
            .into_iter()
            .map(|planet| (planet, bodies.satellites_of(planet)))
            .collect();

        debug!(
            "Keplerian model: {} bodies, {} planets, {} with moons",
            bodies.len(),
            planets.len(),
            moons_by_planet.len()
        );

        Ok(Self {
            bodies,
            config,
            planets,
            moons_by_planet,
            next_frame: 0,
        })
    }

    fn check_parent(
        bodies: &Registry<CelestialBody>,
        body: &CelestialBody,
        parent: BodyId,
        is_expected: fn(&CelestialBody) -> bool,
        expected: &'static str,
    ) -> Result<()> {
        let parent_body = bodies.get(parent).ok_or_else(|| OrreryError::UnknownParent {
            body: body.name.clone(),
            parent: format!("body #{}", parent.index()),
        })?;
        if is_expected(parent_body) {
            Ok(())
        } else {
            Err(OrreryError::WrongKind {
                name: parent_body.name.clone(),
                expected,
            })
        }
    }

    /// The body table
    pub fn bodies(&self) -> &Registry<CelestialBody> {
        &self.bodies
    }

    pub fn config(&self) -> &KeplerConfig {
        &self.config
    }

    /// Planets that have at least one moon
    pub fn planets_with_moons(&self) -> impl Iterator<Item = BodyId> + '_ {
        self.moons_by_planet.iter().map(|(planet, _)| *planet)
    }

    /// Simulated time at a frame index
    pub fn time_at(&self, frame: u64) -> f64 {
        frame as f64 * self.config.time_step
    }

    /// Position of a planet at simulated time `t`, or `None` if `id` is not a
    /// planet
    pub fn planet_position(&self, id: BodyId, t: f64) -> Option<Point2<f64>> {
        let orbit = self.bodies.get(id)?.planet_orbit()?;
        let theta = t / orbit.period;
        Some(ellipse_point(orbit.semi_major_axis, orbit.eccentricity, theta))
    }

    /// Position of a moon at simulated time `t`, or `None` if `id` is not a
    /// moon
    pub fn moon_position(&self, id: BodyId, t: f64) -> Option<Point2<f64>> {
        let orbit = self.bodies.get(id)?.moon_orbit()?;
        let planet = self.planet_position(orbit.planet, t)?;
        Some(Self::moon_offset(planet, orbit.orbit_radius, orbit.angular_speed, t))
    }

    fn moon_offset(
        planet: Point2<f64>,
        orbit_radius: f64,
        angular_speed: f64,
        t: f64,
    ) -> Point2<f64> {
        let angle = angular_speed * t;
        Point2::new(
            planet.x + orbit_radius * angle.cos(),
            planet.y + orbit_radius * angle.sin(),
        )
    }

    /// Positions of every planet and moon at a frame index
    ///
    /// All planets are placed before any moon, so a moon always sees its
    /// planet's position for the same frame. Output follows registry order.
    /// Calling this twice with the same index gives the same result.
    pub fn advance_frame(&self, frame: u64) -> FramePositions {
        let t = self.time_at(frame);
        let mut placed: Vec<Option<Point2<f64>>> = vec![None; self.bodies.len()];

        for &planet in &self.planets {
            placed[planet.index()] = self.planet_position(planet, t);
        }

        for (planet, moons) in &self.moons_by_planet {
            let Some(center) = placed[planet.index()] else {
                continue;
            };
            for &moon in moons {
                if let Some(orbit) = self.bodies.get(moon).and_then(CelestialBody::moon_orbit) {
                    placed[moon.index()] =
                        Some(Self::moon_offset(center, orbit.orbit_radius, orbit.angular_speed, t));
                }
            }
        }

        let positions = self
            .bodies
            .iter()
            .filter_map(|(id, body)| placed[id.index()].map(|p| BodyPosition::new(&body.name, p)))
            .collect();

        trace!("frame {} at t = {}", frame, t);

        FramePositions {
            frame,
            time: t,
            positions,
        }
    }

    /// Static orbit path of a planet, sampled with the configured count
    pub fn orbit_path(&self, id: BodyId) -> Result<Vec<Point2<f64>>> {
        let body = self
            .bodies
            .get(id)
            .ok_or_else(|| OrreryError::UnknownBody(format!("body #{}", id.index())))?;
        let orbit = body.planet_orbit().ok_or_else(|| OrreryError::WrongKind {
            name: body.name.clone(),
            expected: "planet",
        })?;
        orbit_curve(orbit.semi_major_axis, orbit.eccentricity, self.config.orbit_samples)
    }

    /// Frame index the next `advance` call will produce
    pub fn next_frame(&self) -> u64 {
        self.next_frame
    }
}

impl PositionProvider for KeplerModel {
    fn advance(&mut self) -> Result<FramePositions> {
        let frame = self.advance_frame(self.next_frame);
        self.next_frame += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::celestial::{MoonOrbit, PlanetOrbit};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use rstest::rstest;

    fn earth_system() -> (Registry<CelestialBody>, BodyId, BodyId, BodyId) {
        let mut bodies = Registry::new();
        let sun = bodies.insert(CelestialBody::star("Sun", 12.0, 1.989e30)).unwrap();
        let earth = bodies
            .insert(CelestialBody::planet(
                "Earth",
                6.0,
                PlanetOrbit {
                    star: sun,
                    semi_major_axis: 1.0,
                    eccentricity: 0.017,
                    period: 1.0,
                },
            ))
            .unwrap();
        let moon = bodies
            .insert(CelestialBody::moon(
                "Moon",
                2.0,
                MoonOrbit {
                    planet: earth,
                    orbit_radius: 0.05,
                    angular_speed: 12.0,
                },
            ))
            .unwrap();
        (bodies, sun, earth, moon)
    }

    #[rstest]
    #[case(1.0, 0.0)]
    #[case(0.39, 0.205)]
    #[case(30.07, 0.01)]
    #[case(2.5, 0.9)]
    fn test_orbit_curve_closes(#[case] a: f64, #[case] e: f64) {
        let curve = orbit_curve(a, e, 200).unwrap();
        assert_eq!(curve.len(), 200);
        let first = curve[0];
        let last = curve[curve.len() - 1];
        assert_abs_diff_eq!(first.x, last.x, epsilon = 1e-9);
        assert_abs_diff_eq!(first.y, last.y, epsilon = 1e-9);
    }

    #[test]
    fn test_circular_orbit_has_constant_radius() {
        for p in orbit_curve(1.52, 0.0, 64).unwrap() {
            assert_relative_eq!(p.x * p.x + p.y * p.y, 1.52 * 1.52, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_orbit_curve_perihelion_and_aphelion() {
        let curve = orbit_curve(1.0, 0.5, 3).unwrap();
        // θ = 0, π, 2π
        assert_relative_eq!(curve[0].x, 0.5, epsilon = 1e-12);
        assert_relative_eq!(curve[1].x, -1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(curve[1].y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_orbit_curve_small_counts() {
        assert!(orbit_curve(1.0, 0.1, 0).unwrap().is_empty());
        let single = orbit_curve(1.0, 0.0, 1).unwrap();
        assert_eq!(single.len(), 1);
        assert_relative_eq!(single[0].x, 1.0);
    }

    #[rstest]
    #[case(1.0)]
    #[case(1.5)]
    #[case(-0.1)]
    #[case(f64::NAN)]
    fn test_orbit_curve_rejects_open_orbits(#[case] e: f64) {
        let err = orbit_curve(1.0, e, 10).unwrap_err();
        assert!(matches!(err, OrreryError::InvalidEccentricity { .. }));
    }

    #[test]
    fn test_orbit_curve_is_idempotent() {
        assert_eq!(
            orbit_curve(5.2, 0.048, 100).unwrap(),
            orbit_curve(5.2, 0.048, 100).unwrap()
        );
    }

    #[test]
    fn test_earth_at_frame_zero() {
        let (bodies, _, earth, _) = earth_system();
        let model = KeplerModel::new(bodies, KeplerConfig::default()).unwrap();
        let frame = model.advance_frame(0);
        let p = frame.get("Earth").unwrap();
        let expected = (1.0 - 0.017_f64.powi(2)) / 1.017;
        assert_relative_eq!(p.x, expected, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0);
        assert_abs_diff_eq!(p.x, 0.983, epsilon = 1e-3);
        assert_eq!(model.planet_position(earth, 0.0), Some(p));
    }

    #[test]
    fn test_angle_is_time_over_period() {
        let (bodies, _, earth, _) = earth_system();
        let model = KeplerModel::new(bodies, KeplerConfig::default()).unwrap();
        // frame 50 at Δt = 0.02 is t = 1.0, so θ = 1 rad
        let p = model.advance_frame(50).get("Earth").unwrap();
        let r = radius_at(1.0, 0.017, 1.0);
        assert_relative_eq!(p.x, r * 1.0_f64.cos(), epsilon = 1e-12);
        assert_relative_eq!(p.y, r * 1.0_f64.sin(), epsilon = 1e-12);
        assert_eq!(model.planet_position(earth, model.time_at(50)), Some(p));
    }

    #[test]
    fn test_star_is_not_reported() {
        let (bodies, _, _, _) = earth_system();
        let model = KeplerModel::new(bodies, KeplerConfig::default()).unwrap();
        let frame = model.advance_frame(7);
        assert_eq!(frame.len(), 2);
        assert!(frame.get("Sun").is_none());
        let names: Vec<&str> = frame.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Earth", "Moon"]);
    }

    #[test]
    fn test_moon_keeps_its_distance() {
        let (bodies, _, _, moon) = earth_system();
        let model = KeplerModel::new(bodies, KeplerConfig::default()).unwrap();
        for frame_index in [0, 1, 17, 250, 10_000] {
            let frame = model.advance_frame(frame_index);
            let offset = frame.get("Moon").unwrap() - frame.get("Earth").unwrap();
            assert_relative_eq!(offset.norm(), 0.05, epsilon = 1e-12);
            let t = model.time_at(frame_index);
            assert_eq!(model.moon_position(moon, t), frame.get("Moon"));
        }
    }

    #[test]
    fn test_moon_registered_before_its_planet() {
        let mut bodies = Registry::new();
        let sun = bodies.insert(CelestialBody::star("Sun", 12.0, 1.0)).unwrap();
        // Handles are sequential, so the planet will be #2
        let moon = bodies
            .insert(CelestialBody::moon(
                "Moon",
                2.0,
                MoonOrbit {
                    planet: BodyId(2),
                    orbit_radius: 0.1,
                    angular_speed: 3.0,
                },
            ))
            .unwrap();
        bodies
            .insert(CelestialBody::planet(
                "Earth",
                6.0,
                PlanetOrbit {
                    star: sun,
                    semi_major_axis: 1.0,
                    eccentricity: 0.0,
                    period: 1.0,
                },
            ))
            .unwrap();

        let model = KeplerModel::new(bodies, KeplerConfig::default()).unwrap();
        let frame = model.advance_frame(10);
        let offset = frame.get("Moon").unwrap() - frame.get("Earth").unwrap();
        assert_relative_eq!(offset.norm(), 0.1, epsilon = 1e-12);
        assert_eq!(frame.positions[0].name, "Moon");
        assert_eq!(model.moon_position(moon, model.time_at(10)), frame.get("Moon"));
    }

    #[test]
    fn test_provider_counts_frames() {
        let (bodies, _, _, _) = earth_system();
        let mut model = KeplerModel::new(bodies, KeplerConfig::default()).unwrap();
        let first = model.advance().unwrap();
        let second = model.advance().unwrap();
        assert_eq!(first.frame, 0);
        assert_eq!(second.frame, 1);
        assert_eq!(second, model.advance_frame(1));
        assert_eq!(model.next_frame(), 2);
    }

    #[test]
    fn test_rejects_bad_eccentricity() {
        let mut bodies = Registry::new();
        let sun = bodies.insert(CelestialBody::star("Sun", 12.0, 1.0)).unwrap();
        bodies
            .insert(CelestialBody::planet(
                "Comet",
                1.0,
                PlanetOrbit {
                    star: sun,
                    semi_major_axis: 1.0,
                    eccentricity: 1.0,
                    period: 1.0,
                },
            ))
            .unwrap();
        let err = KeplerModel::new(bodies, KeplerConfig::default()).unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(
            err,
            OrreryError::InvalidEccentricity { ref name, .. } if name == "Comet"
        ));
    }

    #[test]
    fn test_rejects_moon_of_star() {
        let mut bodies = Registry::new();
        let sun = bodies.insert(CelestialBody::star("Sun", 12.0, 1.0)).unwrap();
        bodies
            .insert(CelestialBody::moon(
                "Stray",
                1.0,
                MoonOrbit {
                    planet: sun,
                    orbit_radius: 0.1,
                    angular_speed: 1.0,
                },
            ))
            .unwrap();
        let err = KeplerModel::new(bodies, KeplerConfig::default()).unwrap_err();
        assert!(matches!(err, OrreryError::WrongKind { expected: "planet", .. }));
    }

    #[test]
    fn test_rejects_dangling_parent() {
        let mut bodies = Registry::new();
        bodies
            .insert(CelestialBody::moon(
                "Orphan",
                1.0,
                MoonOrbit {
                    planet: BodyId(9),
                    orbit_radius: 0.1,
                    angular_speed: 1.0,
                },
            ))
            .unwrap();
        let err = KeplerModel::new(bodies, KeplerConfig::default()).unwrap_err();
        assert!(matches!(err, OrreryError::UnknownParent { ref body, .. } if body == "Orphan"));
    }

    #[test]
    fn test_rejects_zero_period() {
        let mut bodies = Registry::new();
        let sun = bodies.insert(CelestialBody::star("Sun", 12.0, 1.0)).unwrap();
        bodies
            .insert(CelestialBody::planet(
                "Still",
                1.0,
                PlanetOrbit {
                    star: sun,
                    semi_major_axis: 1.0,
                    eccentricity: 0.0,
                    period: 0.0,
                },
            ))
            .unwrap();
        assert!(KeplerModel::new(bodies, KeplerConfig::default()).is_err());
    }

    #[test]
    fn test_orbit_path_uses_configured_samples() {
        let (bodies, sun, earth, _) = earth_system();
        let model = KeplerModel::new(bodies, KeplerConfig::new().with_orbit_samples(32)).unwrap();
        assert_eq!(model.orbit_path(earth).unwrap().len(), 32);
        assert!(model.orbit_path(sun).is_err());
        assert_eq!(model.planets_with_moons().collect::<Vec<_>>(), vec![earth]);
    }
}
