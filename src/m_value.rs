//! Workman-form M-values and tolerated ambient pressure per compartment.

use crate::tissue::Tissue;
use crate::zh16c::ZhL16c;

/// Below this total inert load a compartment imposes no limit.
const EMPTY_TISSUE: f64 = 1e-10;

/// Inert-load-weighted (a, b) for a compartment, or `None` when the tissue
/// is effectively empty of inert gas.
fn weighted_coefficients(tissue: &Tissue, tissue_index: usize) -> Option<(f64, f64)> {
    let inert = tissue.inert_load();
    if inert < EMPTY_TISSUE {
        return None;
    }
    let a = (ZhL16c::N2_A[tissue_index] * tissue.load_n2
        + ZhL16c::HE_A[tissue_index] * tissue.load_he)
        / inert;
    let b = (ZhL16c::N2_B[tissue_index] * tissue.load_n2
        + ZhL16c::HE_B[tissue_index] * tissue.load_he)
        / inert;
    Some((a, b))
}

/// Maximum tolerated inert-gas pressure at `amb_pressure`:
/// `M = P_amb / b + a`.
pub fn calculate_m_value(tissue: &Tissue, tissue_index: usize, amb_pressure: f64) -> f64 {
    match weighted_coefficients(tissue, tissue_index) {
        Some((a, b)) => amb_pressure / b + a,
        None => 0.0,
    }
}

/// Shallowest ambient pressure at which the current load stays within the
/// gf-scaled supersaturation gradient; from
/// `load <= P_amb + gf * (M(P_amb) - P_amb)` solved for `P_amb`.
pub fn tolerated_ambient_pressure(tissue: &Tissue, tissue_index: usize, gf: f64) -> f64 {
    match weighted_coefficients(tissue, tissue_index) {
        Some((a, b)) => (tissue.inert_load() - a * gf) / (gf / b + 1.0 - gf),
        None => 0.0,
    }
}

#[test]
fn test_m_value_pure_n2() {
    let tissue = Tissue {
        load_n2: 3.0,
        load_he: 0.0,
    };
    let m = calculate_m_value(&tissue, 15, 5.0);
    assert!((m - (5.0 / 0.9653 + 0.2327)).abs() < 1e-12);
}

#[test]
fn test_m_value_empty_tissue() {
    let tissue = Tissue {
        load_n2: 0.0,
        load_he: 0.0,
    };
    assert_eq!(calculate_m_value(&tissue, 0, 1.0), 0.0);
    assert_eq!(tolerated_ambient_pressure(&tissue, 0, 0.85), 0.0);
}

#[test]
fn test_weighted_coefficients_between_species() {
    let tissue = Tissue {
        load_n2: 1.5,
        load_he: 1.5,
    };
    let m = calculate_m_value(&tissue, 4, 1.0);
    let m_n2 = 1.0 / ZhL16c::N2_B[4] + ZhL16c::N2_A[4];
    let m_he = 1.0 / ZhL16c::HE_B[4] + ZhL16c::HE_A[4];
    assert!(m > m_n2.min(m_he) && m < m_n2.max(m_he));
}

#[test]
fn test_tolerated_pressure_consistent_with_m_value() {
    let tissue = Tissue {
        load_n2: 3.2,
        load_he: 0.4,
    };
    let gf = 0.85;
    let p_tol = tolerated_ambient_pressure(&tissue, 6, gf);
    // at the tolerated pressure the load sits exactly on the gf gradient
    let m = calculate_m_value(&tissue, 6, p_tol);
    let allowed = p_tol + gf * (m - p_tol);
    assert!((tissue.inert_load() - allowed).abs() < 1e-9);
}
