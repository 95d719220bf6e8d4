//! Tissue compartment state and the Schreiner gas-loading update.

use core::f64::consts::LN_2;

use libm::{ceil, exp, fabs};

use crate::gas::{effective_gas, Gas};
use crate::pressure::depth_to_bar;
use crate::zh16c::ZhL16c;
use crate::{DecoError, P_H2O, SURFACE_PRESSURE_BAR};

/// Number of compartments in the ZH-L16 model.
pub const TISSUE_COUNT: usize = 16;

/// Depth step for discretising CCR travel segments (m).
const CCR_STEP: f64 = 0.5;

/// CCR segments with less depth change than this are treated as level.
const CCR_LEVEL_TOLERANCE: f64 = 0.01;

/// Dissolved inert-gas partial pressures (bar) of one compartment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tissue {
    pub load_n2: f64,
    pub load_he: f64,
}

impl Tissue {
    /// Equilibrium loading after unlimited time at `surface_pressure` on `gas`.
    pub fn surface_equilibrium(surface_pressure: f64, gas: &Gas) -> Self {
        Tissue {
            load_n2: (surface_pressure - P_H2O) * gas.fn2(),
            load_he: (surface_pressure - P_H2O) * gas.fhe(),
        }
    }

    pub fn inert_load(&self) -> f64 {
        self.load_n2 + self.load_he
    }
}

impl Default for Tissue {
    fn default() -> Self {
        Tissue::surface_equilibrium(SURFACE_PRESSURE_BAR, &Gas::air())
    }
}

// pt(t) = palv0 + R(t - 1/k) - [palv0 - pt0 - R/k] * e^(-kt)
// pt(t) -> partial pressure of the gas in the tissue at time t
// pt0 -> initial partial pressure of the gas in the tissue at t=0
// palv0 -> initial alveolar partial pressure of the gas in the mix at t=0
// k -> tissue time constant, ln(2) / half-time
// R -> rate of change of the inert partial pressure in the alveoli (bar/min),
//      R = Q * Ramb where Q is the inert fraction and Ramb the ambient rate
fn schreiner(pt0: f64, palv0: f64, r: f64, k: f64, t: f64) -> f64 {
    palv0 + r * (t - 1.0 / k) - (palv0 - pt0 - r / k) * exp(-k * t)
}

/// Advance one compartment across an ambient-pressure ramp from
/// `start_pressure` to `end_pressure` over `minutes`, breathing `gas`.
/// Both species update unconditionally; with a constant pressure the ramp
/// term vanishes and the update is plain exponential decay toward the
/// alveolar pressure.
pub fn calculate_tissue(
    mut tissue: Tissue,
    tissue_index: usize,
    start_pressure: f64,
    end_pressure: f64,
    minutes: f64,
    gas: &Gas,
) -> Tissue {
    if minutes <= 0.0 {
        return tissue;
    }

    let ramb = (end_pressure - start_pressure) / minutes;

    let k_n2 = LN_2 / ZhL16c::N2_HALF_LIFE[tissue_index];
    let k_he = LN_2 / ZhL16c::HE_HALF_LIFE[tissue_index];

    tissue.load_n2 = schreiner(
        tissue.load_n2,
        (start_pressure - P_H2O) * gas.fn2(),
        ramb * gas.fn2(),
        k_n2,
        minutes,
    );
    tissue.load_he = schreiner(
        tissue.load_he,
        (start_pressure - P_H2O) * gas.fhe(),
        ramb * gas.fhe(),
        k_he,
        minutes,
    );

    tissue
}

/// Advance all compartments across one open-circuit pressure ramp.
pub fn load_tissues(
    tissues: &mut [Tissue; TISSUE_COUNT],
    start_pressure: f64,
    end_pressure: f64,
    minutes: f64,
    gas: &Gas,
) {
    for i in 0..TISSUE_COUNT {
        tissues[i] = calculate_tissue(tissues[i], i, start_pressure, end_pressure, minutes, gas);
    }
}

/// Advance all compartments across a CCR segment at constant ppO2.
///
/// The loop mix changes with ambient pressure, so a depth change is cut
/// into steps of at most 0.5 m, each breathing the effective gas derived
/// at the step's midpoint depth. Level segments use a single derivation.
pub fn load_tissues_ccr(
    tissues: &mut [Tissue; TISSUE_COUNT],
    start_depth: f64,
    end_depth: f64,
    minutes: f64,
    diluent: &Gas,
    setpoint: f64,
    surface_pressure: f64,
    water_density: f64,
) -> Result<(), DecoError> {
    if minutes <= 0.0 {
        return Ok(());
    }

    let span = fabs(end_depth - start_depth);
    if span <= CCR_LEVEL_TOLERANCE {
        let p0 = depth_to_bar(start_depth, surface_pressure, water_density);
        let p1 = depth_to_bar(end_depth, surface_pressure, water_density);
        let loop_gas = effective_gas(p0, setpoint, diluent)?;
        load_tissues(tissues, p0, p1, minutes, &loop_gas);
        return Ok(());
    }

    let steps = ceil(span / CCR_STEP) as usize;
    let step_time = minutes / steps as f64;
    let step_depth = (end_depth - start_depth) / steps as f64;
    for step in 0..steps {
        let d0 = start_depth + step_depth * step as f64;
        let d1 = start_depth + step_depth * (step + 1) as f64;
        let midpoint = depth_to_bar(0.5 * (d0 + d1), surface_pressure, water_density);
        let loop_gas = effective_gas(midpoint, setpoint, diluent)?;
        load_tissues(
            tissues,
            depth_to_bar(d0, surface_pressure, water_density),
            depth_to_bar(d1, surface_pressure, water_density),
            step_time,
            &loop_gas,
        );
    }
    Ok(())
}

#[test]
fn test_calculate_tissue_no_change() {
    let tissue = Tissue {
        load_n2: 2.0,
        load_he: 0.5,
    };
    let result = calculate_tissue(tissue, 0, 3.0, 3.0, 0.0, &Gas::air());
    assert_eq!(result, tissue);
}

#[test]
fn test_calculate_tissue_loading() {
    let tissue = Tissue {
        load_n2: 2.0,
        load_he: 1.0,
    };
    let result = calculate_tissue(tissue, 0, 4.0, 4.0, 1.0, &Gas::air());

    assert!(result.load_n2 > tissue.load_n2);
    // air carries no helium, the He load decays toward zero
    assert!(result.load_he < tissue.load_he);
}

#[test]
fn test_calculate_tissue_offgassing() {
    let tissue = Tissue {
        load_n2: 2.0,
        load_he: 1.0,
    };
    let result = calculate_tissue(tissue, 0, 1.0, 1.0, 1.0, &Gas::air());
    assert!(result.load_n2 < tissue.load_n2);
}

#[test]
fn test_one_half_time_closes_half_the_gap() {
    let start = Tissue {
        load_n2: 1.0,
        load_he: 0.0,
    };
    let palv = (5.0 - P_H2O) * 0.79;
    // one N2 half-time at constant pressure
    let result = calculate_tissue(start, 0, 5.0, 5.0, ZhL16c::N2_HALF_LIFE[0], &Gas::air());
    let expected = palv + (start.load_n2 - palv) * 0.5;
    assert!(fabs(result.load_n2 - expected) < 1e-12);
}
