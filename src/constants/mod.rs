//! Constants module for the orbit models

use std::f64::consts::PI;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;

// Angles
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// Physics
/// Newtonian gravitational constant in m^3 kg^-1 s^-2 (CODATA 2018)
pub const G: f64 = 6.674_30e-11;

// Keplerian model
/// Simulated time added per animation frame
pub const KEPLER_TIME_STEP: f64 = 0.02;
/// Number of points sampled along a static orbit path
pub const ORBIT_SAMPLES: usize = 200;
/// Default divisor applied to a star's scaled size
pub const STAR_REDUCTION_FACTOR: f64 = 50.0;

// N-body model
/// Integration step of the N-body model (one day)
pub const NBODY_TIME_STEP_S: f64 = DAY_S;
/// Divisor applied to every non-parent pull acting on a moon
pub const MOON_PERTURBATION_DIVISOR: f64 = 10.0;
/// Extra divisor applied to the star's pull on the home planet's moon
pub const HOME_MOON_STAR_DIVISOR: f64 = 50.0;
/// Angle at which a moon is placed relative to its parent (above it)
pub const MOON_LAUNCH_ANGLE: f64 = PI / 2.0;
