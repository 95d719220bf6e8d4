use deco_engine::m_value::{calculate_m_value, tolerated_ambient_pressure};
use deco_engine::{Tissue, SURFACE_PRESSURE_BAR};

#[test]
fn test_m_value_compartment_five_at_surface() {
    // compartment 5 (index 4): a = 0.6667, b = 0.8126
    let tissue = Tissue {
        load_n2: 2.0,
        load_he: 0.0,
    };
    let m = calculate_m_value(&tissue, 4, SURFACE_PRESSURE_BAR);
    assert!(
        (m - 1.9136).abs() < 1e-4,
        "surfacing M-value of compartment 5: {}",
        m
    );
}

#[test]
fn test_m_value_for_all_compartments_decreases_with_index() {
    // slower compartments tolerate less supersaturation
    let tissue = Tissue {
        load_n2: 2.0,
        load_he: 0.0,
    };
    let mut previous = f64::MAX;
    for index in 0..16 {
        let m = calculate_m_value(&tissue, index, SURFACE_PRESSURE_BAR);
        assert!(m < previous, "compartment {}: {} vs {}", index, m, previous);
        previous = m;
    }
}

#[test]
fn test_helium_raises_the_m_value() {
    let n2_only = Tissue {
        load_n2: 3.0,
        load_he: 0.0,
    };
    let mixed = Tissue {
        load_n2: 1.5,
        load_he: 1.5,
    };
    for index in 0..16 {
        let m_n2 = calculate_m_value(&n2_only, index, SURFACE_PRESSURE_BAR);
        let m_mix = calculate_m_value(&mixed, index, SURFACE_PRESSURE_BAR);
        assert!(m_mix > m_n2, "compartment {}", index);
    }
}

#[test]
fn test_tolerated_pressure_scales_with_gf() {
    let tissue = Tissue {
        load_n2: 3.5,
        load_he: 0.5,
    };
    for index in 0..16 {
        let strict = tolerated_ambient_pressure(&tissue, index, 0.3);
        let loose = tolerated_ambient_pressure(&tissue, index, 1.0);
        // a smaller allowed gradient keeps the diver deeper
        assert!(strict > loose, "compartment {}", index);
    }
}

#[test]
fn test_full_gf_recovers_the_raw_m_value_line() {
    // with gf = 1 the tolerated pressure satisfies load = M(P_tol)
    let tissue = Tissue {
        load_n2: 4.0,
        load_he: 0.0,
    };
    for index in 0..16 {
        let p_tol = tolerated_ambient_pressure(&tissue, index, 1.0);
        let m_at_tolerated = calculate_m_value(&tissue, index, p_tol);
        assert!((tissue.load_n2 - m_at_tolerated).abs() < 1e-9);
    }
}
