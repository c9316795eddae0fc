//! Compiled-in body tables
//!
//! The Keplerian tables give orbital elements in AU and years with
//! dimensionless moon speeds tuned for display. The N-body table gives
//! initial states in SI units.

use nalgebra::{Point2, Vector2};

use crate::celestial::{CelestialBody, Color, MoonOrbit, PlanetOrbit};
use crate::constants::HOME_MOON_STAR_DIVISOR;
use crate::kepler::{KeplerConfig, KeplerModel};
use crate::nbody::{Body, NBodyConfig, NBodySystem};
use crate::registry::Registry;
use crate::Result;

/// Planet whose moon gets the reduced star influence in the N-body preset
pub const HOME_PLANET: &str = "Earth";

struct PlanetRow {
    name: &'static str,
    display_size: f64,
    semi_major_axis: f64,
    eccentricity: f64,
    period: f64,
    diameter_km: f64,
    color: &'static str,
}

struct MoonRow {
    name: &'static str,
    display_size: f64,
    planet: &'static str,
    orbit_radius: f64,
    angular_speed: f64,
    diameter_km: f64,
    color: &'static str,
}

const fn planet(
    name: &'static str,
    display_size: f64,
    semi_major_axis: f64,
    eccentricity: f64,
    period: f64,
    diameter_km: f64,
    color: &'static str,
) -> PlanetRow {
    PlanetRow {
        name,
        display_size,
        semi_major_axis,
        eccentricity,
        period,
        diameter_km,
        color,
    }
}

const fn moon(
    name: &'static str,
    display_size: f64,
    planet: &'static str,
    orbit_radius: f64,
    angular_speed: f64,
    diameter_km: f64,
    color: &'static str,
) -> MoonRow {
    MoonRow {
        name,
        display_size,
        planet,
        orbit_radius,
        angular_speed,
        diameter_km,
        color,
    }
}

const SUN_NAME: &str = "Sun";
const SUN_DISPLAY_SIZE: f64 = 12.0;
const SUN_MASS_KG: f64 = 1.989e30;
const SUN_DIAMETER_KM: f64 = 1_392_000.0;
const SUN_COLOR: &str = "#FFD700";

/// Number of rocky planets, which lead the planet table
const INNER_PLANETS: usize = 4;

#[rustfmt::skip]
const PLANETS: [PlanetRow; 8] = [
    planet("Mercury", 3.0,  0.39, 0.205,   0.24,   4_879.0, "#B4B4B4"),
    planet("Venus",   6.0,  0.72, 0.007,   0.62,  12_104.0, "#D5C79E"),
    planet("Earth",   6.0,  1.0,  0.017,   1.0,   12_742.0, "#1E90FF"),
    planet("Mars",    4.0,  1.52, 0.093,   1.88,   6_779.0, "#FF4500"),
    planet("Jupiter", 8.0,  5.2,  0.048,  11.86, 139_822.0, "#D97F1F"),
    planet("Saturn",  9.0,  9.58, 0.056,  29.46, 116_460.0, "#F4C200"),
    planet("Uranus",  7.0, 19.18, 0.046,  84.01,  50_724.0, "#4A9B8F"),
    planet("Neptune", 8.0, 30.07, 0.010, 164.8,   49_244.0, "#4C6A92"),
];

#[rustfmt::skip]
const MOONS: [MoonRow; 19] = [
    moon("Moon",     2.0, "Earth",   0.05,   12.0, 3_474.0, "#D3D3D3"),
    moon("Phobos",   1.0, "Mars",    0.01,    8.0,    22.0, "#6D6D6D"),
    moon("Deimos",   1.0, "Mars",    0.02,   16.0,    12.0, "#A8A8A8"),
    moon("Io",       1.0, "Jupiter", 0.0035,  9.0, 3_643.0, "#F4A300"),
    moon("Europa",   1.0, "Jupiter", 0.009,  10.0, 3_121.0, "#B0E0E6"),
    moon("Ganymede", 1.0, "Jupiter", 0.015,  11.0, 5_268.0, "#C0C0C0"),
    moon("Callisto", 1.0, "Jupiter", 0.02,   13.0, 4_821.0, "#8B7D7B"),
    moon("Titan",    1.0, "Saturn",  0.012,  22.0, 5_150.0, "#D17A27"),
    moon("Rhea",     1.0, "Saturn",  0.03,   10.0, 1_528.0, "#C0C0C0"),
    moon("Iapetus",  1.0, "Saturn",  0.075,  15.0, 1_469.0, "#2F2F2F"),
    moon("Dione",    1.0, "Saturn",  0.075,  10.0, 1_123.0, "#DCDCDC"),
    moon("Tethys",   1.0, "Saturn",  0.078,  10.0, 1_062.0, "#F8F8FF"),
    moon("Miranda",  1.0, "Uranus",  0.008,   6.0,   471.0, "#B0C4DE"),
    moon("Ariel",    1.0, "Uranus",  0.015,   8.0, 1_157.0, "#7EC8E6"),
    moon("Umbriel",  1.0, "Uranus",  0.019,   7.0, 1_169.0, "#4B4B4B"),
    moon("Titania",  1.0, "Uranus",  0.03,    9.0, 1_578.0, "#A3BFD9"),
    moon("Oberon",   1.0, "Uranus",  0.03,   10.0, 1_523.0, "#708090"),
    moon("Triton",   1.0, "Neptune", 0.007,  15.0, 2_706.0, "#7FFFD4"),
    moon("Nereid",   1.0, "Neptune", 0.032,   7.0,   340.0, "#4B6D60"),
];

/// Build a Keplerian body table from the first `planet_count` planets and
/// the moons that orbit them
fn kepler_bodies(planet_count: usize) -> Result<Registry<CelestialBody>> {
    let mut bodies = Registry::new();
    let sun = bodies.insert(
        CelestialBody::star(SUN_NAME, SUN_DISPLAY_SIZE, SUN_MASS_KG)
            .with_diameter_km(SUN_DIAMETER_KM)
            .with_color_str(SUN_COLOR)?,
    )?;

    for row in PLANETS.iter().take(planet_count) {
        let orbit = PlanetOrbit {
            star: sun,
            semi_major_axis: row.semi_major_axis,
            eccentricity: row.eccentricity,
            period: row.period,
        };
        bodies.insert(
            CelestialBody::planet(row.name, row.display_size, orbit)
                .with_diameter_km(row.diameter_km)
                .with_color_str(row.color)?,
        )?;
    }

    for row in &MOONS {
        let Some(planet) = bodies.id_of(row.planet) else {
            continue;
        };
        let orbit = MoonOrbit {
            planet,
            orbit_radius: row.orbit_radius,
            angular_speed: row.angular_speed,
        };
        bodies.insert(
            CelestialBody::moon(row.name, row.display_size, orbit)
                .with_diameter_km(row.diameter_km)
                .with_color_str(row.color)?,
        )?;
    }

    Ok(bodies)
}

/// Sun, the four rocky planets and their three moons
pub fn inner_solar_system_bodies() -> Result<Registry<CelestialBody>> {
    kepler_bodies(INNER_PLANETS)
}

/// Sun, all eight planets and nineteen moons
pub fn full_solar_system_bodies() -> Result<Registry<CelestialBody>> {
    kepler_bodies(PLANETS.len())
}

/// Keplerian model of the inner solar system with default settings
pub fn inner_solar_system() -> Result<KeplerModel> {
    KeplerModel::new(inner_solar_system_bodies()?, KeplerConfig::default())
}

/// Keplerian model of the full solar system with default settings
pub fn full_solar_system() -> Result<KeplerModel> {
    KeplerModel::new(full_solar_system_bodies()?, KeplerConfig::default())
}

/// N-body model of the Sun, Earth, Mars and Jupiter with three moons
///
/// Bodies start on the x axis with circular-ish tangential speeds. The
/// Moon's pull from the Sun is reduced by [`HOME_MOON_STAR_DIVISOR`] on top
/// of the usual moon attenuation.
pub fn nbody_solar_system(config: NBodyConfig) -> Result<NBodySystem> {
    let mut system = NBodySystem::new(config)?;

    let free = |name: &str, x: f64, radius: f64, color: Color, mass: f64, vy: f64| {
        Body::new(name, Point2::new(x, 0.0), Vector2::new(0.0, vy), radius, color, mass)
    };

    let sun = system.add_body(free(SUN_NAME, 0.0, 30.0, Color::YELLOW, SUN_MASS_KG, 0.0))?;
    let earth = system.add_body(free(HOME_PLANET, 1.5e11, 10.0, Color::BLUE, 5.972e24, 29_780.0))?;
    let mars = system.add_body(free("Mars", 2.28e11, 7.0, Color::RED, 6.39e23, 24_070.0))?;
    system.add_body(free("Jupiter", 7.78e11, 20.0, Color::ORANGE, 1.898e27, 13_070.0))?;

    let moon = system.add_moon("Moon", earth, 3.84e8, 3.0, Color::GRAY, 7.35e22)?;
    system.add_moon("Phobos", mars, 9.38e6, 2.0, Color::GRAY, 1.07e16)?;
    system.add_moon("Deimos", mars, 2.34e7, 2.0, Color::GRAY, 1.48e15)?;

    system.reduce_star_influence(moon, sun, HOME_MOON_STAR_DIVISOR)?;

    Ok(system)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_table() {
        let bodies = inner_solar_system_bodies().unwrap();
        let names: Vec<&str> = bodies.names().collect();
        assert_eq!(
            names,
            ["Sun", "Mercury", "Venus", "Earth", "Mars", "Moon", "Phobos", "Deimos"]
        );
        let with_moons: Vec<&str> = bodies
            .parents_with_satellites()
            .into_iter()
            .filter_map(|id| bodies.get(id))
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(with_moons, ["Earth", "Mars"]);
    }

    #[test]
    fn test_full_table() {
        let bodies = full_solar_system_bodies().unwrap();
        assert_eq!(bodies.len(), 1 + 8 + 19);
        assert_eq!(bodies.parents_with_satellites().len(), 6);
        let sun = bodies.get_by_name("Sun").unwrap();
        assert_eq!(sun.color, Color::rgb(0xFF, 0xD7, 0x00));
        assert!(full_solar_system().is_ok());
    }

    #[test]
    fn test_nbody_table() {
        let system = nbody_solar_system(NBodyConfig::default()).unwrap();
        assert_eq!(system.bodies().len(), 7);

        let moon = system.body_by_name("Moon").unwrap();
        let binding = moon.moon().unwrap();
        let influence = binding.reduced_star_influence.unwrap();
        assert_eq!(influence.divisor, 50.0);
        assert_eq!(system.body(influence.star).unwrap().name, "Sun");
        assert_eq!(system.body(binding.parent).unwrap().name, HOME_PLANET);

        // Only the home planet's moon has the reduced star pull
        let phobos = system.body_by_name("Phobos").unwrap();
        assert!(phobos.moon().unwrap().reduced_star_influence.is_none());
    }
}
