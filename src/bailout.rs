//! Worst-case bailout analysis for a planned CCR dive.

use alloc::vec::Vec;

use crate::deco::calculate_deco_stops;
use crate::gas::Gas;
use crate::pressure::depth_to_bar;
use crate::tissue::{load_tissues, load_tissues_ccr, Tissue, TISSUE_COUNT};
use crate::{DecoConfig, DecoError, DiveSegment};

/// One leg of a planned CCR dive.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CcrSegment {
    pub start_depth: f64,
    pub end_depth: f64,
    pub time: f64,
    pub setpoint: f64,
}

/// The worst point in a CCR dive to lose the loop, and the open-circuit
/// plan for getting out of it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BailoutAnalysis {
    pub worst_case_depth: f64,
    pub worst_case_tts: f64,
    /// The planned CCR segments leading up to the worst-case point.
    pub ccr_segments_to_worst_case: Vec<CcrSegment>,
    /// Open-circuit schedule out of the worst case, troubleshooting hold
    /// included when one is configured.
    pub bailout_schedule: Vec<DiveSegment>,
}

/// Replay the planned dive on a simulation copy, snapshotting tissues at
/// every segment boundary, and rank the boundaries by open-circuit time to
/// surface on the carried bailout gases. The first bailout gas is the one
/// breathed at the bailout point; the rest act as deco gases gated by MOD.
pub fn calculate_bailout_plan(
    tissues: &[Tissue; TISSUE_COUNT],
    plan: &[CcrSegment],
    diluent: &Gas,
    bailout_gases: &[Gas],
    gf_low: f64,
    gf_high: f64,
    config: &DecoConfig,
    surface_pressure: f64,
    water_density: f64,
) -> Result<BailoutAnalysis, DecoError> {
    let (primary, deco_gases) = match bailout_gases.split_first() {
        Some(split) => split,
        None => return Err(DecoError::InvalidGas),
    };

    let mut sim = *tissues;
    let mut worst: Option<(f64, f64, usize, Vec<DiveSegment>)> = None;

    for (index, segment) in plan.iter().enumerate() {
        load_tissues_ccr(
            &mut sim,
            segment.start_depth,
            segment.end_depth,
            segment.time,
            diluent,
            segment.setpoint,
            surface_pressure,
            water_density,
        )?;

        let depth = segment.end_depth;
        let mut bailed = sim;
        if config.troubleshooting_time > 0.0 {
            let amb = depth_to_bar(depth, surface_pressure, water_density);
            load_tissues(&mut bailed, amb, amb, config.troubleshooting_time, primary);
        }
        let schedule = calculate_deco_stops(
            &bailed,
            gf_low,
            gf_high,
            depth,
            primary,
            deco_gases,
            config,
            surface_pressure,
            water_density,
        )?;
        let tts = config.troubleshooting_time.max(0.0)
            + schedule.iter().map(|segment| segment.time).sum::<f64>();

        if worst.as_ref().map_or(true, |(worst_tts, ..)| tts > *worst_tts) {
            worst = Some((tts, depth, index + 1, schedule));
        }
    }

    // an empty plan has nothing to bail out of
    let (tts, depth, segments_played, schedule) = match worst {
        Some(found) => found,
        None => {
            return Ok(BailoutAnalysis {
                worst_case_depth: 0.0,
                worst_case_tts: 0.0,
                ccr_segments_to_worst_case: Vec::new(),
                bailout_schedule: Vec::new(),
            })
        }
    };

    let mut bailout_schedule = Vec::with_capacity(schedule.len() + 1);
    if config.troubleshooting_time > 0.0 {
        bailout_schedule.push(DiveSegment {
            start_depth: depth,
            end_depth: depth,
            time: config.troubleshooting_time,
            gas: *primary,
        });
    }
    bailout_schedule.extend(schedule);

    Ok(BailoutAnalysis {
        worst_case_depth: depth,
        worst_case_tts: tts,
        ccr_segments_to_worst_case: plan[..segments_played].to_vec(),
        bailout_schedule,
    })
}
