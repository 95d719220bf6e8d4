#![no_std]

#[cfg(feature = "std")]
extern crate std;

extern crate alloc;

pub mod bailout;
pub mod ceiling;
pub mod deco;
pub mod engine;
pub mod gas;
pub mod m_value;
pub mod ndl;
pub mod pressure;
pub mod tissue;
pub mod zh16c;

pub use bailout::{calculate_bailout_plan, BailoutAnalysis, CcrSegment};
pub use deco::{
    calculate_ccr_deco_stops, calculate_deco_stops, next_stop_depth, time_to_surface,
};
pub use engine::DecoEngine;
pub use gas::{effective_gas, Gas};
pub use tissue::{Tissue, TISSUE_COUNT};

/// Water vapour pressure in the lungs (bar), at body temperature.
pub const P_H2O: f64 = 0.0627;

/// Standard gravity (m/s^2).
pub const GRAVITY: f64 = 9.80665;

/// Salt water density (kg/m^3).
pub const WATER_DENSITY_SALT: f64 = 1030.0;

/// Fresh water density (kg/m^3).
pub const WATER_DENSITY_FRESH: f64 = 1000.0;

/// One standard atmosphere (bar).
pub const SURFACE_PRESSURE_BAR: f64 = 1.01325;

/// Hard cap on scheduler iterations. A well-formed dive finishes in a few
/// thousand; hitting this means the profile is not survivable as configured.
pub(crate) const MAX_DECO_ITERATIONS: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecoError {
    /// Gas fractions out of range or not summing to 1.
    InvalidGas,
    /// The diluent cannot supply the inert fraction the setpoint demands.
    CannotDilute,
    /// The deco scheduler hit its iteration cap.
    MaxDurationExceeded,
}

/// How the scheduler accounts for time spent switching gases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GasSwitchMode {
    /// Swap instantly, no time logged.
    Disabled,
    /// Hold at least `gas_switch_time` minutes on the new gas.
    Minimum,
    /// Hold `gas_switch_time` minutes on the old gas, then swap.
    Additive,
}

impl Default for GasSwitchMode {
    fn default() -> Self {
        GasSwitchMode::Disabled
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoConfig {
    /// Travel speed between stops (m/min).
    pub ascent_rate: f64,
    /// Travel speed from the last stop to the surface (m/min).
    pub surface_rate: f64,
    /// Spacing of candidate stop depths (m).
    pub stop_increment: f64,
    /// Shallowest stop (m); below it the ascent goes straight to 0.
    pub last_stop_depth: f64,
    /// Time charged at a gas switch (min).
    pub gas_switch_time: f64,
    pub gas_switch_mode: GasSwitchMode,
    /// Time held at depth on the bailout gas before the ascent begins (min).
    pub troubleshooting_time: f64,
}

impl Default for DecoConfig {
    fn default() -> Self {
        DecoConfig {
            ascent_rate: 9.0,
            surface_rate: 3.0,
            stop_increment: 3.0,
            last_stop_depth: 3.0,
            gas_switch_time: 1.0,
            gas_switch_mode: GasSwitchMode::Disabled,
            troubleshooting_time: 0.0,
        }
    }
}

/// A linear depth change at constant rate over `time` minutes, breathing `gas`.
/// A stop is a segment whose start and end depth coincide.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiveSegment {
    pub start_depth: f64,
    pub end_depth: f64,
    pub time: f64,
    pub gas: Gas,
}

impl DiveSegment {
    pub fn is_stop(&self) -> bool {
        libm::fabs(self.start_depth - self.end_depth) < 1e-9
    }
}
