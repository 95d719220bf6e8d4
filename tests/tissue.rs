use deco_engine::pressure::depth_to_bar;
use deco_engine::tissue::{calculate_tissue, load_tissues};
use deco_engine::{
    DecoEngine, Gas, Tissue, P_H2O, SURFACE_PRESSURE_BAR, TISSUE_COUNT, WATER_DENSITY_SALT,
};

#[test]
fn test_fresh_surface_load_on_air() {
    let engine = DecoEngine::default();
    // (1.01325 - 0.0627) * 0.79
    let expected = (SURFACE_PRESSURE_BAR - P_H2O) * 0.79;
    assert!((expected - 0.751).abs() < 0.001);
    for tissue in engine.tissues() {
        assert!((tissue.load_n2 - expected).abs() < 1e-12);
        assert_eq!(tissue.load_he, 0.0);
    }
}

#[test]
fn test_schreiner_one_half_time_at_depth() {
    // four minutes at 30 m is one half-time for the fastest compartment:
    // its N2 load lands halfway between surface equilibrium and the
    // alveolar pressure at depth
    let mut engine = DecoEngine::default();
    engine.add_segment(30.0, 30.0, 4.0, &Gas::air(), SURFACE_PRESSURE_BAR);

    let fast = engine.tissues()[0];
    assert!(
        (fast.load_n2 - 1.945).abs() < 0.05,
        "fast compartment at one half-time: {}",
        fast.load_n2
    );
}

#[test]
fn test_ramped_segment_lands_between_endpoints() {
    let mut constant_shallow = DecoEngine::default();
    let mut constant_deep = DecoEngine::default();
    let mut ramped = DecoEngine::default();

    let air = Gas::air();
    constant_shallow.add_segment(10.0, 10.0, 10.0, &air, SURFACE_PRESSURE_BAR);
    constant_deep.add_segment(40.0, 40.0, 10.0, &air, SURFACE_PRESSURE_BAR);
    ramped.add_segment(10.0, 40.0, 10.0, &air, SURFACE_PRESSURE_BAR);

    for i in 0..TISSUE_COUNT {
        let low = constant_shallow.tissues()[i].load_n2;
        let high = constant_deep.tissues()[i].load_n2;
        let mid = ramped.tissues()[i].load_n2;
        assert!(mid > low && mid < high, "compartment {}: {} not in ({}, {})", i, mid, low, high);
    }
}

#[test]
fn test_helium_collapses_without_helium_in_the_mix() {
    // a tissue carrying He and breathing air decays toward zero He
    let mut tissues = [Tissue {
        load_n2: 1.0,
        load_he: 1.2,
    }; TISSUE_COUNT];
    let amb = depth_to_bar(10.0, SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT);
    for _ in 0..600 {
        load_tissues(&mut tissues, amb, amb, 1.0, &Gas::air());
    }
    for tissue in &tissues {
        assert!(tissue.load_he < 0.01);
        assert!(tissue.load_he >= 0.0);
    }
}

#[test]
fn test_loads_stay_non_negative() {
    let mut engine = DecoEngine::default();
    let air = Gas::air();
    let tmx = Gas::new(0.18, 0.45).unwrap();

    engine.add_segment(0.0, 60.0, 3.0, &tmx, SURFACE_PRESSURE_BAR);
    engine.add_segment(60.0, 60.0, 25.0, &tmx, SURFACE_PRESSURE_BAR);
    engine.add_segment(60.0, 9.0, 6.0, &air, SURFACE_PRESSURE_BAR);
    engine.add_segment(9.0, 9.0, 30.0, &air, SURFACE_PRESSURE_BAR);
    engine.add_segment(9.0, 0.0, 3.0, &air, SURFACE_PRESSURE_BAR);
    engine.add_segment(0.0, 0.0, 600.0, &air, SURFACE_PRESSURE_BAR);

    for tissue in engine.tissues() {
        assert!(tissue.load_n2 >= 0.0);
        assert!(tissue.load_he >= 0.0);
    }
}

#[test]
fn test_zero_time_segment_changes_nothing() {
    let tissue = Tissue {
        load_n2: 2.0,
        load_he: 0.3,
    };
    let result = calculate_tissue(tissue, 3, 2.0, 5.0, 0.0, &Gas::air());
    assert_eq!(result, tissue);
}

#[test]
fn test_saturation_approaches_alveolar_pressure() {
    let mut engine = DecoEngine::default();
    let air = Gas::air();
    // ~27 half-times for the slowest compartment
    for _ in 0..120 {
        engine.add_segment(30.0, 30.0, 144.0, &air, SURFACE_PRESSURE_BAR);
    }
    let amb = depth_to_bar(30.0, SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT);
    let alveolar = (amb - P_H2O) * 0.79;
    for tissue in engine.tissues() {
        assert!((tissue.load_n2 - alveolar).abs() < 1e-6);
    }
}
