//! Hydrostatic conversion between depth and absolute ambient pressure.
//!
//! Parameterised by surface pressure and water density; the common
//! "10 m per bar" shortcut is deliberately not used.

use crate::GRAVITY;

/// Absolute pressure (bar) at `depth` meters of water.
pub fn depth_to_bar(depth: f64, surface_pressure: f64, water_density: f64) -> f64 {
    surface_pressure + water_density * GRAVITY * depth / 100_000.0
}

/// Depth (m) at which the given absolute pressure is reached.
pub fn bar_to_depth(pressure: f64, surface_pressure: f64, water_density: f64) -> f64 {
    (pressure - surface_pressure) * 100_000.0 / (water_density * GRAVITY)
}

#[test]
fn test_surface_pressure() {
    use crate::{SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT};
    let p = depth_to_bar(0.0, SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT);
    assert_eq!(p, SURFACE_PRESSURE_BAR);
}

#[test]
fn test_ten_meters_is_not_one_bar() {
    use crate::{SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT};
    let p = depth_to_bar(10.0, SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT);
    // salt water at 1030 kg/m^3: 10 m adds ~1.010 bar
    assert!((p - SURFACE_PRESSURE_BAR - 1.0100).abs() < 0.001);
}

#[test]
fn test_round_trip() {
    use crate::{SURFACE_PRESSURE_BAR, WATER_DENSITY_FRESH, WATER_DENSITY_SALT};
    for density in [WATER_DENSITY_SALT, WATER_DENSITY_FRESH] {
        let mut depth = 0.0;
        while depth <= 200.0 {
            let p = depth_to_bar(depth, SURFACE_PRESSURE_BAR, density);
            let d = bar_to_depth(p, SURFACE_PRESSURE_BAR, density);
            assert!((d - depth).abs() < 1e-3, "round trip at {} m: {}", depth, d);
            depth += 0.25;
        }
    }
}
