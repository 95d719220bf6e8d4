//! CCR dive planner with worst-case bailout analysis.
//!
//! Plans a square CCR dive at constant ppO2, prints the loop schedule, then
//! finds the worst point to lose the loop and the open-circuit plan out.
//!
//! Run with: `cargo run --example bailout_planner`

use std::io::{self, Write};

use deco_engine::{CcrSegment, DecoConfig, DecoEngine, DiveSegment, Gas, SURFACE_PRESSURE_BAR};

fn get_float_input(prompt: &str, default: f64) -> f64 {
    loop {
        print!("{} (default: {}): ", prompt, default);
        io::stdout().flush().unwrap();

        let mut input = String::new();
        io::stdin().read_line(&mut input).unwrap();

        let input = input.trim();
        if input.is_empty() {
            return default;
        }

        match input.parse::<f64>() {
            Ok(value) => return value,
            Err(_) => println!("Invalid input. Please enter a valid number."),
        }
    }
}

fn print_schedule(schedule: &[DiveSegment]) {
    println!("From (m) |  To (m) | Time (min) |  fO2  |  fHe");
    println!("---------|---------|------------|-------|------");
    for segment in schedule {
        println!(
            "  {:6.1} |  {:6.1} |    {:7.1} | {:.3} | {:.3}",
            segment.start_depth,
            segment.end_depth,
            segment.time,
            segment.gas.fo2(),
            segment.gas.fhe()
        );
    }
}

fn main() {
    println!("=== CCR Planner with Bailout Analysis ===\n");

    let depth = get_float_input("Bottom depth (m)", 60.0);
    let bottom_time = get_float_input("Bottom time (min)", 20.0);
    let setpoint = get_float_input("Setpoint (bar ppO2)", 1.3);
    let fo2 = get_float_input("Diluent fO2", 0.18);
    let fhe = get_float_input("Diluent fHe", 0.40);
    let gf_low = get_float_input("GF Low (0.0-1.0)", 0.3);
    let gf_high = get_float_input("GF High (0.0-1.0)", 0.85);
    let troubleshooting = get_float_input("Troubleshooting time at depth (min)", 2.0);

    let diluent = match Gas::new(fo2, fhe) {
        Ok(gas) => gas,
        Err(error) => {
            println!("Bad diluent: {:?}", error);
            return;
        }
    };

    let descent_time = depth / 18.0;
    let plan = [
        CcrSegment {
            start_depth: 0.0,
            end_depth: depth,
            time: descent_time,
            setpoint,
        },
        CcrSegment {
            start_depth: depth,
            end_depth: depth,
            time: bottom_time,
            setpoint,
        },
    ];

    let mut engine = DecoEngine::default();
    for segment in &plan {
        if let Err(error) = engine.add_ccr_segment(
            segment.start_depth,
            segment.end_depth,
            segment.time,
            &diluent,
            segment.setpoint,
            SURFACE_PRESSURE_BAR,
        ) {
            println!("Cannot run the loop on this diluent: {:?}", error);
            return;
        }
    }

    let config = DecoConfig {
        troubleshooting_time: troubleshooting,
        ..DecoConfig::default()
    };

    println!("\n--- Loop deco schedule ---");
    match engine.calculate_ccr_deco_stops(
        gf_low,
        gf_high,
        depth,
        &diluent,
        setpoint,
        &config,
        SURFACE_PRESSURE_BAR,
    ) {
        Ok(schedule) => {
            print_schedule(&schedule);
            let tts: f64 = schedule.iter().map(|segment| segment.time).sum();
            println!("Loop time to surface: {:.1} min", tts);
        }
        Err(error) => println!("Loop schedule failed: {:?}", error),
    }

    // bailout is planned from pre-dive state, replaying the whole profile
    let bailout_gases = [Gas::air(), Gas::with_mod(0.50, 0.0, 22.0).unwrap()];
    let fresh = DecoEngine::default();
    match fresh.calculate_bailout_plan(
        &plan,
        &diluent,
        &bailout_gases,
        gf_low,
        gf_high,
        &config,
        SURFACE_PRESSURE_BAR,
    ) {
        Ok(analysis) => {
            println!("\n--- Worst-case bailout ---");
            println!(
                "Worst at {:.1} m, {:.1} min to surface on open circuit",
                analysis.worst_case_depth, analysis.worst_case_tts
            );
            print_schedule(&analysis.bailout_schedule);
        }
        Err(error) => println!("Bailout analysis failed: {:?}", error),
    }
}
