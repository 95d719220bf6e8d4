//! Interactive open-circuit deco planner built on the deco-engine library.
//!
//! Prompts for a square profile and gradient factors, then prints the NDL,
//! the ceiling and the full ascent schedule.
//!
//! Run with: `cargo run --example planner`

use std::io::{self, Write};

use deco_engine::{DecoConfig, DecoEngine, Gas, SURFACE_PRESSURE_BAR};

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

fn main() {
    println!("=== Open-Circuit Deco Planner ===\n");

    let depth = get_float_input("Bottom depth (m)", 40.0);
    let bottom_time = get_float_input("Bottom time (min)", 20.0);
    let gf_low = get_float_input("GF Low (0.0-1.0)", 0.3);
    let gf_high = get_float_input("GF High (0.0-1.0)", 0.85);
    let fo2 = get_float_input("Bottom gas fO2", 0.21);
    let fhe = get_float_input("Bottom gas fHe", 0.0);

    let bottom_gas = match Gas::new(fo2, fhe) {
        Ok(gas) => gas,
        Err(error) => {
            println!("Bad bottom gas: {:?}", error);
            return;
        }
    };

    let mut deco_gases = Vec::new();
    let use_ean50 = get_float_input("Carry EAN50 for deco? (1 = yes, 0 = no)", 1.0);
    if use_ean50 > 0.5 {
        deco_gases.push(Gas::with_mod(0.50, 0.0, 22.0).unwrap());
    }

    let mut engine = DecoEngine::default();
    println!("\nNDL at {} m before the dive: {} min", depth, engine.ndl(depth, &bottom_gas, gf_high, SURFACE_PRESSURE_BAR));

    engine.add_segment(0.0, depth, depth / 18.0, &bottom_gas, SURFACE_PRESSURE_BAR);
    engine.add_segment(depth, depth, bottom_time, &bottom_gas, SURFACE_PRESSURE_BAR);

    println!(
        "Ceiling at the end of the bottom phase: {:.1} m",
        engine.ceiling(gf_low, gf_high, None, SURFACE_PRESSURE_BAR)
    );

    let schedule = match engine.calculate_deco_stops(
        gf_low,
        gf_high,
        depth,
        &bottom_gas,
        &deco_gases,
        &DecoConfig::default(),
        SURFACE_PRESSURE_BAR,
    ) {
        Ok(schedule) => schedule,
        Err(error) => {
            println!("No survivable schedule: {:?}", error);
            return;
        }
    };

    println!("\nFrom (m) |  To (m) | Time (min) |  fO2  |  fHe");
    println!("---------|---------|------------|-------|------");
    let mut runtime = depth / 18.0 + bottom_time;
    for segment in &schedule {
        runtime += segment.time;
        println!(
            "  {:6.1} |  {:6.1} |    {:7.1} | {:.3} | {:.3}",
            segment.start_depth,
            segment.end_depth,
            segment.time,
            segment.gas.fo2(),
            segment.gas.fhe()
        );
    }
    let tts: f64 = schedule.iter().map(|segment| segment.time).sum();
    println!("\nTime to surface: {:.1} min", tts);
    println!("Total runtime:   {:.1} min", runtime);
}
