//! Replays a recorded per-second depth profile through the engine and
//! checks the model invariants at every minute of the dive.

#![cfg(feature = "std")]

use deco_engine::ceiling::{ceiling, linear_ceiling};
use deco_engine::{DecoEngine, Gas, SURFACE_PRESSURE_BAR};

fn read_profile() -> Vec<f64> {
    let mut reader = csv::Reader::from_path("depth.csv").unwrap();
    let mut depths = Vec::new();
    for record in reader.records() {
        let record = record.unwrap();
        depths.push(record[0].parse::<f64>().unwrap());
    }
    depths
}

#[test]
fn test_profile_replay_invariants() {
    let depths = read_profile();
    assert!(!depths.is_empty());

    let mut engine = DecoEngine::default();
    let air = Gas::air();
    let mut previous = 0.0_f64;
    let mut saw_a_ceiling = false;

    for (second, depth) in depths.iter().enumerate() {
        engine.add_segment(previous, *depth, 1.0 / 60.0, &air, SURFACE_PRESSURE_BAR);
        previous = *depth;

        for tissue in engine.tissues() {
            assert!(tissue.load_n2 >= 0.0, "negative N2 load at second {}", second);
            assert!(tissue.load_he >= 0.0, "negative He load at second {}", second);
        }

        if second % 60 == 0 {
            let binary = ceiling(
                engine.tissues(),
                0.3,
                0.85,
                None,
                SURFACE_PRESSURE_BAR,
                engine.water_density(),
            );
            let linear = linear_ceiling(
                engine.tissues(),
                0.3,
                0.85,
                None,
                SURFACE_PRESSURE_BAR,
                engine.water_density(),
            );
            assert!(
                (binary - linear).abs() <= 0.1 + 1e-9,
                "solvers disagree at second {}: {} vs {}",
                second,
                binary,
                linear
            );
            if binary > 0.0 {
                saw_a_ceiling = true;
            }
        }
    }

    // 25 minutes at 30 m on air must have put the diver into deco at some point
    assert!(saw_a_ceiling);
}
