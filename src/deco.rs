//! Decompression scheduling: the stop grid, the open-circuit scheduler with
//! its gas-switch policy, the CCR scheduler and time-to-surface.

use alloc::vec;
use alloc::vec::Vec;

use libm::{fabs, floor};

use crate::ceiling::{ceiling, clamp_gradient_factors, first_stop_depth};
use crate::gas::{effective_gas, Gas};
use crate::pressure::depth_to_bar;
use crate::tissue::{load_tissues, load_tissues_ccr, Tissue, TISSUE_COUNT};
use crate::{DecoConfig, DecoError, DiveSegment, GasSwitchMode, MAX_DECO_ITERATIONS};

/// Depths closer than this count as already on a grid point.
const GRID_SNAP: f64 = 0.01;

/// The ascent is finished once the diver is within this of the surface.
const SURFACED: f64 = 0.01;

/// Slack on ceiling-vs-stop comparisons.
const CEILING_MARGIN: f64 = 1e-9;

/// Duration of one scheduler hold tick: one second, in minutes. With the
/// iteration cap this bounds simulated deco at roughly 28 hours.
const STOP_QUANTUM: f64 = 1.0 / 60.0;

/// Next candidate stop below `depth` on the stop grid. Depths between the
/// surface and the last stop go straight to 0; depths below it never skip it.
pub fn next_stop_depth(depth: f64, config: &DecoConfig) -> f64 {
    let mut next = floor(depth / config.stop_increment) * config.stop_increment;
    if fabs(next - depth) < GRID_SNAP {
        next -= config.stop_increment;
    }
    if next > 0.0 && next < config.last_stop_depth {
        next = if depth > config.last_stop_depth {
            config.last_stop_depth
        } else {
            0.0
        };
    }
    next.max(0.0)
}

fn push_stop(schedule: &mut Vec<DiveSegment>, depth: f64, minutes: f64, gas: Gas) {
    if let Some(last) = schedule.last_mut() {
        if last.is_stop() && fabs(last.start_depth - depth) < 1e-9 && last.gas == gas {
            last.time += minutes;
            return;
        }
    }
    schedule.push(DiveSegment {
        start_depth: depth,
        end_depth: depth,
        time: minutes,
        gas,
    });
}

fn push_travel(schedule: &mut Vec<DiveSegment>, from: f64, to: f64, minutes: f64, gas: Gas) {
    if let Some(last) = schedule.last_mut() {
        if !last.is_stop() && fabs(last.end_depth - from) < 1e-9 && last.gas == gas {
            let last_rate = (last.start_depth - last.end_depth) / last.time;
            let rate = (from - to) / minutes;
            if fabs(last_rate - rate) < 1e-9 {
                last.end_depth = to;
                last.time += minutes;
                return;
            }
        }
    }
    schedule.push(DiveSegment {
        start_depth: from,
        end_depth: to,
        time: minutes,
        gas,
    });
}

fn hold(
    tissues: &mut [Tissue; TISSUE_COUNT],
    depth: f64,
    minutes: f64,
    gas: &Gas,
    surface_pressure: f64,
    water_density: f64,
) {
    let amb = depth_to_bar(depth, surface_pressure, water_density);
    load_tissues(tissues, amb, amb, minutes, gas);
}

/// Deco gases keyed by the grid depth at which they become available.
struct SwitchTable {
    entries: Vec<(f64, Gas)>,
    taken: Vec<bool>,
}

impl SwitchTable {
    fn new(deco_gases: &[Gas], stop_increment: f64) -> Self {
        let mut entries: Vec<(f64, Gas)> = deco_gases
            .iter()
            .map(|gas| {
                // a deco gas without a MOD may be taken at any depth
                let depth = gas.switch_depth(stop_increment).unwrap_or(f64::INFINITY);
                (depth, *gas)
            })
            .collect();
        entries.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(core::cmp::Ordering::Equal));
        let taken = vec![false; entries.len()];
        SwitchTable { entries, taken }
    }

    /// Best un-taken gas breathable at `depth`: highest fO2, ties broken by
    /// highest fHe. The winner is marked taken; a winner matching the
    /// current mix within tolerance yields no switch.
    fn select(&mut self, depth: f64, current: &Gas) -> Option<Gas> {
        let mut best: Option<usize> = None;
        for (index, (switch_depth, gas)) in self.entries.iter().enumerate() {
            if self.taken[index] || *switch_depth < depth - CEILING_MARGIN || !gas.safe_at(depth) {
                continue;
            }
            let better = match best {
                Some(current_best) => {
                    let best_gas = &self.entries[current_best].1;
                    gas.fo2() > best_gas.fo2()
                        || (gas.fo2() == best_gas.fo2() && gas.fhe() > best_gas.fhe())
                }
                None => true,
            };
            if better {
                best = Some(index);
            }
        }
        let index = best?;
        self.taken[index] = true;
        let gas = self.entries[index].1;
        if gas.same_mix(current) {
            return None;
        }
        Some(gas)
    }
}

/// Open-circuit ascent schedule from `current_depth` to the surface.
///
/// The gradient-factor slope is anchored on the first-stop depth computed
/// once from the starting tissue state; recomputing it per stop would make
/// the schedule drift instead of converge. Each iteration either switches
/// gas, ascends one grid step (when the ceiling clears the next stop), or
/// holds one tick at the current depth; consecutive ticks merge into one
/// stop segment.
pub fn calculate_deco_stops(
    tissues: &[Tissue; TISSUE_COUNT],
    gf_low: f64,
    gf_high: f64,
    current_depth: f64,
    bottom_gas: &Gas,
    deco_gases: &[Gas],
    config: &DecoConfig,
    surface_pressure: f64,
    water_density: f64,
) -> Result<Vec<DiveSegment>, DecoError> {
    let (gf_low, gf_high) = clamp_gradient_factors(gf_low, gf_high);
    let mut sim = *tissues;
    let mut depth = current_depth;
    let mut gas = *bottom_gas;
    let mut schedule = Vec::new();

    let first_stop = first_stop_depth(&sim, gf_low, surface_pressure, water_density);
    let mut switches = SwitchTable::new(deco_gases, config.stop_increment);

    for _ in 0..MAX_DECO_ITERATIONS {
        if depth <= SURFACED {
            return Ok(schedule);
        }
        let stop = next_stop_depth(depth, config);

        if let Some(next_gas) = switches.select(depth, &gas) {
            match config.gas_switch_mode {
                GasSwitchMode::Disabled => {
                    gas = next_gas;
                }
                GasSwitchMode::Minimum => {
                    gas = next_gas;
                    hold(
                        &mut sim,
                        depth,
                        config.gas_switch_time,
                        &gas,
                        surface_pressure,
                        water_density,
                    );
                    push_stop(&mut schedule, depth, config.gas_switch_time, gas);
                    continue;
                }
                GasSwitchMode::Additive => {
                    hold(
                        &mut sim,
                        depth,
                        config.gas_switch_time,
                        &gas,
                        surface_pressure,
                        water_density,
                    );
                    push_stop(&mut schedule, depth, config.gas_switch_time, gas);
                    gas = next_gas;
                    continue;
                }
            }
        }

        let clears = ceiling(
            &sim,
            gf_low,
            gf_high,
            Some(first_stop),
            surface_pressure,
            water_density,
        ) <= stop + CEILING_MARGIN;

        if clears {
            let rate = if stop <= 0.0 {
                config.surface_rate
            } else {
                config.ascent_rate
            };
            let minutes = (depth - stop) / rate;
            load_tissues(
                &mut sim,
                depth_to_bar(depth, surface_pressure, water_density),
                depth_to_bar(stop, surface_pressure, water_density),
                minutes,
                &gas,
            );
            push_travel(&mut schedule, depth, stop, minutes, gas);
            depth = stop;
        } else {
            hold(
                &mut sim,
                depth,
                STOP_QUANTUM,
                &gas,
                surface_pressure,
                water_density,
            );
            push_stop(&mut schedule, depth, STOP_QUANTUM, gas);
        }
    }
    Err(DecoError::MaxDurationExceeded)
}

/// CCR ascent schedule at constant ppO2. Same skeleton as the open-circuit
/// scheduler with the gas-switch step removed; every emitted segment carries
/// the loop mix derived at the stop depth or the travel midpoint.
pub fn calculate_ccr_deco_stops(
    tissues: &[Tissue; TISSUE_COUNT],
    gf_low: f64,
    gf_high: f64,
    current_depth: f64,
    diluent: &Gas,
    setpoint: f64,
    config: &DecoConfig,
    surface_pressure: f64,
    water_density: f64,
) -> Result<Vec<DiveSegment>, DecoError> {
    let (gf_low, gf_high) = clamp_gradient_factors(gf_low, gf_high);
    let mut sim = *tissues;
    let mut depth = current_depth;
    let mut schedule = Vec::new();

    let first_stop = first_stop_depth(&sim, gf_low, surface_pressure, water_density);

    for _ in 0..MAX_DECO_ITERATIONS {
        if depth <= SURFACED {
            return Ok(schedule);
        }
        let stop = next_stop_depth(depth, config);

        let clears = ceiling(
            &sim,
            gf_low,
            gf_high,
            Some(first_stop),
            surface_pressure,
            water_density,
        ) <= stop + CEILING_MARGIN;

        if clears {
            let rate = if stop <= 0.0 {
                config.surface_rate
            } else {
                config.ascent_rate
            };
            let minutes = (depth - stop) / rate;
            let midpoint = depth_to_bar(0.5 * (depth + stop), surface_pressure, water_density);
            let travel_gas = effective_gas(midpoint, setpoint, diluent)?;
            load_tissues_ccr(
                &mut sim,
                depth,
                stop,
                minutes,
                diluent,
                setpoint,
                surface_pressure,
                water_density,
            )?;
            push_travel(&mut schedule, depth, stop, minutes, travel_gas);
            depth = stop;
        } else {
            let amb = depth_to_bar(depth, surface_pressure, water_density);
            let loop_gas = effective_gas(amb, setpoint, diluent)?;
            hold(
                &mut sim,
                depth,
                STOP_QUANTUM,
                &loop_gas,
                surface_pressure,
                water_density,
            );
            push_stop(&mut schedule, depth, STOP_QUANTUM, loop_gas);
        }
    }
    Err(DecoError::MaxDurationExceeded)
}

/// Total minutes from `current_depth` to the surface on open circuit,
/// stops and travel included.
pub fn time_to_surface(
    tissues: &[Tissue; TISSUE_COUNT],
    gf_low: f64,
    gf_high: f64,
    current_depth: f64,
    bottom_gas: &Gas,
    deco_gases: &[Gas],
    config: &DecoConfig,
    surface_pressure: f64,
    water_density: f64,
) -> Result<f64, DecoError> {
    let schedule = calculate_deco_stops(
        tissues,
        gf_low,
        gf_high,
        current_depth,
        bottom_gas,
        deco_gases,
        config,
        surface_pressure,
        water_density,
    )?;
    Ok(schedule.iter().map(|segment| segment.time).sum())
}

#[test]
fn test_next_stop_between_grid_points() {
    let config = DecoConfig::default();
    assert_eq!(next_stop_depth(40.0, &config), 39.0);
    assert_eq!(next_stop_depth(5.0, &config), 3.0);
}

#[test]
fn test_next_stop_on_grid_point_steps_down() {
    let config = DecoConfig::default();
    assert_eq!(next_stop_depth(39.0, &config), 36.0);
    assert_eq!(next_stop_depth(6.0, &config), 3.0);
}

#[test]
fn test_next_stop_last_stop_policy() {
    let config = DecoConfig::default();
    // at the last stop: next is the surface
    assert_eq!(next_stop_depth(3.0, &config), 0.0);
    // shallower than the last stop: straight up
    assert_eq!(next_stop_depth(2.0, &config), 0.0);

    let deep_last = DecoConfig {
        last_stop_depth: 6.0,
        ..DecoConfig::default()
    };
    // already above the last stop: the grid point at 3 is skipped
    assert_eq!(next_stop_depth(5.0, &deep_last), 0.0);
    assert_eq!(next_stop_depth(8.0, &deep_last), 6.0);
}
