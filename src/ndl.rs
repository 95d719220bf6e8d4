//! No-decompression limit.

use crate::ceiling::{ceiling, clamp_gradient_factors};
use crate::gas::Gas;
use crate::m_value::tolerated_ambient_pressure;
use crate::pressure::depth_to_bar;
use crate::tissue::{calculate_tissue, Tissue, TISSUE_COUNT};

/// NDLs longer than this are reported as this.
pub const NDL_CAP_MINUTES: u32 = 999;

/// Minutes the diver may remain at `depth` on `gas` before a direct ascent
/// stops being possible. Simulated in 1-minute iso-depth steps on a clone
/// of the tissue state; returns 0 when a deco obligation already exists.
pub fn ndl(
    tissues: &[Tissue; TISSUE_COUNT],
    depth: f64,
    gas: &Gas,
    gf: f64,
    surface_pressure: f64,
    water_density: f64,
) -> u32 {
    let (gf, _) = clamp_gradient_factors(gf, gf);

    if ceiling(tissues, gf, gf, None, surface_pressure, water_density) > 0.0 {
        return 0;
    }

    let amb = depth_to_bar(depth, surface_pressure, water_density);
    let mut sim = *tissues;
    for minute in 1..=NDL_CAP_MINUTES {
        for i in 0..TISSUE_COUNT {
            sim[i] = calculate_tissue(sim[i], i, amb, amb, 1.0, gas);
        }
        for (i, tissue) in sim.iter().enumerate() {
            if tolerated_ambient_pressure(tissue, i, gf) > surface_pressure {
                return minute - 1;
            }
        }
    }
    NDL_CAP_MINUTES
}

#[test]
fn test_surface_ndl_is_capped() {
    use crate::{SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT};
    let tissues = [Tissue::default(); TISSUE_COUNT];
    let result = ndl(
        &tissues,
        0.0,
        &Gas::air(),
        1.0,
        SURFACE_PRESSURE_BAR,
        WATER_DENSITY_SALT,
    );
    assert_eq!(result, NDL_CAP_MINUTES);
}

#[test]
fn test_ndl_zero_when_already_in_deco() {
    use crate::{SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT};
    let mut tissues = [Tissue::default(); TISSUE_COUNT];
    for tissue in tissues.iter_mut() {
        tissue.load_n2 = 4.0;
    }
    let result = ndl(
        &tissues,
        30.0,
        &Gas::air(),
        0.85,
        SURFACE_PRESSURE_BAR,
        WATER_DENSITY_SALT,
    );
    assert_eq!(result, 0);
}
