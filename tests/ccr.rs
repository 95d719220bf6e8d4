use deco_engine::pressure::depth_to_bar;
use deco_engine::{
    effective_gas, CcrSegment, DecoConfig, DecoEngine, DecoError, Gas, SURFACE_PRESSURE_BAR,
    WATER_DENSITY_SALT,
};

#[test]
fn test_effective_gas_60m_tmx_10_50() {
    let diluent = Gas::new(0.10, 0.50).unwrap();
    let amb = depth_to_bar(60.0, SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT);
    let loop_gas = effective_gas(amb, 1.3, &diluent).unwrap();

    assert!(
        (loop_gas.fo2() - 0.184).abs() < 0.001,
        "loop fO2 at 60 m: {}",
        loop_gas.fo2()
    );
    // the inert remainder keeps the diluent's He:N2 proportions
    let he_share = loop_gas.fhe() / (loop_gas.fhe() + loop_gas.fn2());
    assert!(
        (he_share - 0.50 / 0.90).abs() < 0.01,
        "He share of inert: {}",
        he_share
    );
    let total = loop_gas.fo2() + loop_gas.fhe() + loop_gas.fn2();
    assert!((total - 1.0).abs() < 1e-12);
}

#[test]
fn test_setpoint_capped_by_ambient_pressure() {
    // just below the surface the loop cannot hold 1.3 bar of O2
    let diluent = Gas::air();
    let amb = depth_to_bar(0.5, SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT);
    let loop_gas = effective_gas(amb, 1.3, &diluent).unwrap();
    assert_eq!(loop_gas.fo2(), 1.0);
    assert_eq!(loop_gas.fhe(), 0.0);
    assert_eq!(loop_gas.fn2(), 0.0);
}

#[test]
fn test_lean_diluent_cannot_dilute() {
    let mut engine = DecoEngine::default();
    // a near-pure O2 "diluent" cannot supply the inert fraction at depth
    let lean = Gas::new(0.999, 0.0).unwrap();
    let result = engine.add_ccr_segment(30.0, 30.0, 5.0, &lean, 1.3, SURFACE_PRESSURE_BAR);
    assert_eq!(result, Err(DecoError::CannotDilute));
}

#[test]
fn test_level_ccr_segment_matches_open_circuit_on_the_loop_mix() {
    let diluent = Gas::air();
    let amb = depth_to_bar(30.0, SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT);
    let loop_gas = effective_gas(amb, 1.0, &diluent).unwrap();

    let mut ccr = DecoEngine::default();
    ccr.add_ccr_segment(30.0, 30.0, 10.0, &diluent, 1.0, SURFACE_PRESSURE_BAR)
        .unwrap();

    let mut oc = DecoEngine::default();
    oc.add_segment(30.0, 30.0, 10.0, &loop_gas, SURFACE_PRESSURE_BAR);

    for (a, b) in ccr.tissues().iter().zip(oc.tissues().iter()) {
        assert!((a.load_n2 - b.load_n2).abs() < 1e-12);
        assert!((a.load_he - b.load_he).abs() < 1e-12);
    }
}

#[test]
fn test_ccr_loop_mix_leans_out_with_depth() {
    let diluent = Gas::new(0.18, 0.40).unwrap();
    let shallow = effective_gas(
        depth_to_bar(15.0, SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT),
        1.3,
        &diluent,
    )
    .unwrap();
    let deep = effective_gas(
        depth_to_bar(60.0, SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT),
        1.3,
        &diluent,
    )
    .unwrap();
    assert!(deep.fo2() < shallow.fo2());
}

#[test]
fn test_ccr_deco_beats_open_circuit_on_the_diluent() {
    let diluent = Gas::air();
    let setpoint = 1.3;
    let config = DecoConfig::default();

    let mut ccr = DecoEngine::default();
    ccr.add_ccr_segment(0.0, 45.0, 5.0, &diluent, setpoint, SURFACE_PRESSURE_BAR)
        .unwrap();
    ccr.add_ccr_segment(45.0, 45.0, 20.0, &diluent, setpoint, SURFACE_PRESSURE_BAR)
        .unwrap();
    let ccr_schedule = ccr
        .calculate_ccr_deco_stops(
            0.3,
            0.85,
            45.0,
            &diluent,
            setpoint,
            &config,
            SURFACE_PRESSURE_BAR,
        )
        .unwrap();
    let ccr_tts: f64 = ccr_schedule.iter().map(|segment| segment.time).sum();

    let mut oc = DecoEngine::default();
    oc.add_segment(0.0, 45.0, 5.0, &diluent, SURFACE_PRESSURE_BAR);
    oc.add_segment(45.0, 45.0, 20.0, &diluent, SURFACE_PRESSURE_BAR);
    let oc_tts = oc
        .time_to_surface(
            0.3,
            0.85,
            45.0,
            &diluent,
            &[],
            &config,
            SURFACE_PRESSURE_BAR,
        )
        .unwrap();

    assert!(
        ccr_tts < oc_tts,
        "CCR at SP {} should clear faster: {} vs {}",
        setpoint,
        ccr_tts,
        oc_tts
    );
}

#[test]
fn test_ccr_schedule_reaches_the_surface_on_the_loop_mix() {
    let diluent = Gas::new(0.18, 0.40).unwrap();
    let mut engine = DecoEngine::default();
    engine
        .add_ccr_segment(0.0, 60.0, 6.0, &diluent, 1.3, SURFACE_PRESSURE_BAR)
        .unwrap();
    engine
        .add_ccr_segment(60.0, 60.0, 20.0, &diluent, 1.3, SURFACE_PRESSURE_BAR)
        .unwrap();

    let schedule = engine
        .calculate_ccr_deco_stops(
            0.3,
            0.85,
            60.0,
            &diluent,
            1.3,
            &DecoConfig::default(),
            SURFACE_PRESSURE_BAR,
        )
        .unwrap();

    assert!(schedule.last().unwrap().end_depth < 0.1);
    // the loop mix gets richer in O2 as the diver ascends
    let first = schedule.first().unwrap();
    let last_stop = schedule
        .iter()
        .rev()
        .find(|segment| segment.is_stop())
        .expect("a 60m/20min dive carries deco");
    assert!(last_stop.gas.fo2() > first.gas.fo2());

    let mut depth = 60.0;
    for segment in &schedule {
        assert!(segment.start_depth <= depth + 1e-9);
        depth = segment.end_depth;
    }
}

#[test]
fn test_bailout_worst_case_is_the_end_of_the_bottom_phase() {
    let diluent = Gas::new(0.18, 0.40).unwrap();
    let plan = [
        CcrSegment {
            start_depth: 0.0,
            end_depth: 45.0,
            time: 4.0,
            setpoint: 1.3,
        },
        CcrSegment {
            start_depth: 45.0,
            end_depth: 45.0,
            time: 20.0,
            setpoint: 1.3,
        },
        CcrSegment {
            start_depth: 45.0,
            end_depth: 30.0,
            time: 2.0,
            setpoint: 1.3,
        },
    ];
    let bailout_gases = [Gas::air(), Gas::with_mod(0.50, 0.0, 22.0).unwrap()];
    let config = DecoConfig {
        troubleshooting_time: 2.0,
        ..DecoConfig::default()
    };

    let engine = DecoEngine::default();
    let analysis = engine
        .calculate_bailout_plan(
            &plan,
            &diluent,
            &bailout_gases,
            0.3,
            0.85,
            &config,
            SURFACE_PRESSURE_BAR,
        )
        .unwrap();

    assert_eq!(analysis.worst_case_depth, 45.0);
    assert_eq!(analysis.ccr_segments_to_worst_case.len(), 2);
    assert_eq!(analysis.ccr_segments_to_worst_case[1], plan[1]);

    // the schedule opens with the troubleshooting hold on the primary gas
    let hold = &analysis.bailout_schedule[0];
    assert!(hold.is_stop());
    assert_eq!(hold.start_depth, 45.0);
    assert_eq!(hold.time, 2.0);
    assert!((hold.gas.fo2() - 0.21).abs() < 1e-9);

    assert!(analysis.bailout_schedule.last().unwrap().end_depth < 0.1);

    let total: f64 = analysis
        .bailout_schedule
        .iter()
        .map(|segment| segment.time)
        .sum();
    assert!((analysis.worst_case_tts - total).abs() < 1e-9);
}

#[test]
fn test_bailout_needs_at_least_one_gas() {
    let engine = DecoEngine::default();
    let plan = [CcrSegment {
        start_depth: 0.0,
        end_depth: 30.0,
        time: 3.0,
        setpoint: 1.3,
    }];
    let result = engine.calculate_bailout_plan(
        &plan,
        &Gas::air(),
        &[],
        0.3,
        0.85,
        &DecoConfig::default(),
        SURFACE_PRESSURE_BAR,
    );
    assert_eq!(result.unwrap_err(), DecoError::InvalidGas);
}
