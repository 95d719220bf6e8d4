//! Decompression ceiling: gradient-factor slope, safety predicate and the
//! binary-search solver, plus the linear reference scan it is checked against.

use libm::ceil;

use crate::m_value::{calculate_m_value, tolerated_ambient_pressure};
use crate::pressure::{bar_to_depth, depth_to_bar};
use crate::tissue::{Tissue, TISSUE_COUNT};

/// Slack added to the supersaturation comparison.
const SUPERSATURATION_EPSILON: f64 = 1e-9;

/// Binary-search termination (m).
const DEPTH_RESOLUTION: f64 = 0.01;

/// Linear reference scan step (m), also the rounding grain of the result.
const SCAN_STEP: f64 = 0.1;

pub(crate) fn clamp_gradient_factors(gf_low: f64, gf_high: f64) -> (f64, f64) {
    let gf_high = gf_high.clamp(0.01, 1.0);
    let gf_low = gf_low.clamp(0.01, 1.0).min(gf_high);
    (gf_low, gf_high)
}

/// Deepest depth tolerated at `gf_low` over all compartments. This anchors
/// the gradient-factor slope for a whole ascent; never negative.
pub fn first_stop_depth(
    tissues: &[Tissue; TISSUE_COUNT],
    gf_low: f64,
    surface_pressure: f64,
    water_density: f64,
) -> f64 {
    let mut deepest = 0.0_f64;
    for (i, tissue) in tissues.iter().enumerate() {
        let p_tol = tolerated_ambient_pressure(tissue, i, gf_low);
        deepest = deepest.max(bar_to_depth(p_tol, surface_pressure, water_density));
    }
    deepest
}

/// The gradient factor in force at `depth`: `gf_low` at and below the first
/// stop, rising linearly to `gf_high` at the surface.
fn gf_at_depth(depth: f64, first_stop: f64, gf_low: f64, gf_high: f64) -> f64 {
    if first_stop <= 0.0 {
        return gf_high;
    }
    if depth >= first_stop {
        return gf_low;
    }
    gf_high - (gf_high - gf_low) * (depth / first_stop)
}

fn depth_is_safe(
    tissues: &[Tissue; TISSUE_COUNT],
    depth: f64,
    gf: f64,
    surface_pressure: f64,
    water_density: f64,
) -> bool {
    let amb = depth_to_bar(depth, surface_pressure, water_density);
    for (i, tissue) in tissues.iter().enumerate() {
        let m = calculate_m_value(tissue, i, amb);
        if tissue.inert_load() > amb + gf * (m - amb) + SUPERSATURATION_EPSILON {
            return false;
        }
    }
    true
}

/// Shallowest depth the diver may occupy, by binary search to 0.01 m,
/// rounded up to the next 0.1 m. Safety is monotonic in depth, which is
/// what makes the bisection invariant (`lo` unsafe, `hi` safe) hold.
///
/// `fixed_first_stop_depth` pins the gradient-factor slope anchor; the
/// schedulers pass the anchor computed at the start of the ascent so the
/// slope does not drift while tissues off-gas.
pub fn ceiling(
    tissues: &[Tissue; TISSUE_COUNT],
    gf_low: f64,
    gf_high: f64,
    fixed_first_stop_depth: Option<f64>,
    surface_pressure: f64,
    water_density: f64,
) -> f64 {
    let (gf_low, gf_high) = clamp_gradient_factors(gf_low, gf_high);
    let first_stop = match fixed_first_stop_depth {
        Some(depth) => depth,
        None => first_stop_depth(tissues, gf_low, surface_pressure, water_density),
    };

    let safe = |depth: f64| {
        let gf = gf_at_depth(depth, first_stop, gf_low, gf_high);
        depth_is_safe(tissues, depth, gf, surface_pressure, water_density)
    };

    if safe(0.0) {
        return 0.0;
    }
    let mut hi = first_stop + SCAN_STEP;
    if !safe(hi) {
        return first_stop.max(0.0);
    }
    let mut lo = 0.0;
    while hi - lo > DEPTH_RESOLUTION {
        let mid = 0.5 * (lo + hi);
        if safe(mid) {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    ceil(hi * 10.0) / 10.0
}

/// Reference implementation: walk up from the first stop in 0.1 m steps
/// until the next shallower step is unsafe. Agrees with [`ceiling`] to
/// within one step; kept as a cross-check for the solver.
pub fn linear_ceiling(
    tissues: &[Tissue; TISSUE_COUNT],
    gf_low: f64,
    gf_high: f64,
    fixed_first_stop_depth: Option<f64>,
    surface_pressure: f64,
    water_density: f64,
) -> f64 {
    let (gf_low, gf_high) = clamp_gradient_factors(gf_low, gf_high);
    let first_stop = match fixed_first_stop_depth {
        Some(depth) => depth,
        None => first_stop_depth(tissues, gf_low, surface_pressure, water_density),
    };

    let safe = |depth: f64| {
        let gf = gf_at_depth(depth, first_stop, gf_low, gf_high);
        depth_is_safe(tissues, depth, gf, surface_pressure, water_density)
    };

    if safe(0.0) {
        return 0.0;
    }
    let mut candidate = first_stop + SCAN_STEP;
    if !safe(candidate) {
        return first_stop.max(0.0);
    }
    loop {
        let shallower = candidate - SCAN_STEP;
        if shallower <= 0.0 || !safe(shallower) {
            return candidate;
        }
        candidate = shallower;
    }
}

#[test]
fn test_equilibrium_tissues_have_no_ceiling() {
    use crate::{SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT};
    let tissues = [Tissue::default(); TISSUE_COUNT];
    let result = ceiling(
        &tissues,
        0.3,
        0.85,
        None,
        SURFACE_PRESSURE_BAR,
        WATER_DENSITY_SALT,
    );
    assert_eq!(result, 0.0);
}

#[test]
fn test_loaded_tissues_have_a_ceiling() {
    use crate::{SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT};
    let mut tissues = [Tissue::default(); TISSUE_COUNT];
    for tissue in tissues.iter_mut() {
        tissue.load_n2 = 3.0;
    }
    let result = ceiling(
        &tissues,
        1.0,
        1.0,
        None,
        SURFACE_PRESSURE_BAR,
        WATER_DENSITY_SALT,
    );
    assert!(result > 0.0);
}

#[test]
fn test_lower_gf_means_deeper_ceiling() {
    use crate::{SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT};
    let mut tissues = [Tissue::default(); TISSUE_COUNT];
    for tissue in tissues.iter_mut() {
        tissue.load_n2 = 3.5;
    }
    let conservative = ceiling(
        &tissues,
        0.3,
        0.3,
        None,
        SURFACE_PRESSURE_BAR,
        WATER_DENSITY_SALT,
    );
    let permissive = ceiling(
        &tissues,
        0.9,
        0.9,
        None,
        SURFACE_PRESSURE_BAR,
        WATER_DENSITY_SALT,
    );
    assert!(conservative > permissive);
}
