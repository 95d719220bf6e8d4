//! The owning engine: a vector of sixteen compartments plus the water it
//! sits in. Mutating entry points advance the real dive; queries run on a
//! clone of the tissue vector, so the engine itself can be cloned cheaply
//! for what-if planning across threads.

use alloc::vec::Vec;

use crate::bailout::{self, BailoutAnalysis, CcrSegment};
use crate::deco;
use crate::gas::Gas;
use crate::pressure::depth_to_bar;
use crate::tissue::{load_tissues, load_tissues_ccr, Tissue, TISSUE_COUNT};
use crate::{DecoConfig, DecoError, DiveSegment, SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoEngine {
    tissues: [Tissue; TISSUE_COUNT],
    surface_pressure: f64,
    water_density: f64,
}

impl Default for DecoEngine {
    fn default() -> Self {
        DecoEngine::new(SURFACE_PRESSURE_BAR, WATER_DENSITY_SALT, SURFACE_PRESSURE_BAR)
    }
}

impl DecoEngine {
    /// `initial_surface_pressure` is the pressure the diver is acclimatised
    /// to and seeds the tissues; pass the local surface pressure for both
    /// arguments unless modelling an altitude dive after sea-level
    /// saturation.
    pub fn new(
        surface_pressure: f64,
        water_density: f64,
        initial_surface_pressure: f64,
    ) -> Self {
        let mut engine = DecoEngine {
            tissues: [Tissue::default(); TISSUE_COUNT],
            surface_pressure,
            water_density,
        };
        engine.initialize_tissues(initial_surface_pressure, &Gas::air());
        engine
    }

    pub fn surface_pressure(&self) -> f64 {
        self.surface_pressure
    }

    pub fn water_density(&self) -> f64 {
        self.water_density
    }

    pub fn tissues(&self) -> &[Tissue; TISSUE_COUNT] {
        &self.tissues
    }

    /// Reset every compartment to surface equilibrium on `gas`.
    pub fn initialize_tissues(&mut self, surface_pressure: f64, gas: &Gas) {
        self.tissues = [Tissue::surface_equilibrium(surface_pressure, gas); TISSUE_COUNT];
    }

    /// Record an open-circuit segment: a linear depth change (or hold) over
    /// `time` minutes breathing `gas`. Non-positive times are ignored.
    pub fn add_segment(
        &mut self,
        start_depth: f64,
        end_depth: f64,
        time: f64,
        gas: &Gas,
        surface_pressure: f64,
    ) {
        if time <= 0.0 {
            return;
        }
        load_tissues(
            &mut self.tissues,
            depth_to_bar(start_depth, surface_pressure, self.water_density),
            depth_to_bar(end_depth, surface_pressure, self.water_density),
            time,
            gas,
        );
    }

    /// Record a CCR segment at constant ppO2 `setpoint` on `diluent`.
    pub fn add_ccr_segment(
        &mut self,
        start_depth: f64,
        end_depth: f64,
        time: f64,
        diluent: &Gas,
        setpoint: f64,
        surface_pressure: f64,
    ) -> Result<(), DecoError> {
        if time <= 0.0 {
            return Ok(());
        }
        load_tissues_ccr(
            &mut self.tissues,
            start_depth,
            end_depth,
            time,
            diluent,
            setpoint,
            surface_pressure,
            self.water_density,
        )
    }

    /// Current decompression ceiling (m).
    pub fn ceiling(
        &self,
        gf_low: f64,
        gf_high: f64,
        fixed_first_stop_depth: Option<f64>,
        surface_pressure: f64,
    ) -> f64 {
        crate::ceiling::ceiling(
            &self.tissues,
            gf_low,
            gf_high,
            fixed_first_stop_depth,
            surface_pressure,
            self.water_density,
        )
    }

    /// No-decompression limit (min) at `depth` on `gas`, capped at 999.
    pub fn ndl(&self, depth: f64, gas: &Gas, gf: f64, surface_pressure: f64) -> u32 {
        crate::ndl::ndl(
            &self.tissues,
            depth,
            gas,
            gf,
            surface_pressure,
            self.water_density,
        )
    }

    pub fn calculate_deco_stops(
        &self,
        gf_low: f64,
        gf_high: f64,
        current_depth: f64,
        bottom_gas: &Gas,
        deco_gases: &[Gas],
        config: &DecoConfig,
        surface_pressure: f64,
    ) -> Result<Vec<DiveSegment>, DecoError> {
        deco::calculate_deco_stops(
            &self.tissues,
            gf_low,
            gf_high,
            current_depth,
            bottom_gas,
            deco_gases,
            config,
            surface_pressure,
            self.water_density,
        )
    }

    pub fn calculate_ccr_deco_stops(
        &self,
        gf_low: f64,
        gf_high: f64,
        current_depth: f64,
        diluent: &Gas,
        setpoint: f64,
        config: &DecoConfig,
        surface_pressure: f64,
    ) -> Result<Vec<DiveSegment>, DecoError> {
        deco::calculate_ccr_deco_stops(
            &self.tissues,
            gf_low,
            gf_high,
            current_depth,
            diluent,
            setpoint,
            config,
            surface_pressure,
            self.water_density,
        )
    }

    pub fn time_to_surface(
        &self,
        gf_low: f64,
        gf_high: f64,
        current_depth: f64,
        bottom_gas: &Gas,
        deco_gases: &[Gas],
        config: &DecoConfig,
        surface_pressure: f64,
    ) -> Result<f64, DecoError> {
        deco::time_to_surface(
            &self.tissues,
            gf_low,
            gf_high,
            current_depth,
            bottom_gas,
            deco_gases,
            config,
            surface_pressure,
            self.water_density,
        )
    }

    /// Worst-case open-circuit bailout for a planned CCR dive starting from
    /// the engine's current tissue state.
    pub fn calculate_bailout_plan(
        &self,
        plan: &[CcrSegment],
        diluent: &Gas,
        bailout_gases: &[Gas],
        gf_low: f64,
        gf_high: f64,
        config: &DecoConfig,
        surface_pressure: f64,
    ) -> Result<BailoutAnalysis, DecoError> {
        bailout::calculate_bailout_plan(
            &self.tissues,
            plan,
            diluent,
            bailout_gases,
            gf_low,
            gf_high,
            config,
            surface_pressure,
            self.water_density,
        )
    }
}

#[test]
fn test_fresh_engine_is_equilibrated() {
    let engine = DecoEngine::default();
    let expected = (SURFACE_PRESSURE_BAR - crate::P_H2O) * 0.79;
    for tissue in engine.tissues() {
        assert!(libm::fabs(tissue.load_n2 - expected) < 1e-12);
        assert_eq!(tissue.load_he, 0.0);
    }
}

#[test]
fn test_engine_is_send() {
    fn assert_send<T: Send + Clone>() {}
    assert_send::<DecoEngine>();
}

#[test]
fn test_negative_time_segment_is_ignored() {
    let mut engine = DecoEngine::default();
    let before = *engine.tissues();
    engine.add_segment(0.0, 30.0, -5.0, &Gas::air(), SURFACE_PRESSURE_BAR);
    assert_eq!(*engine.tissues(), before);
}
