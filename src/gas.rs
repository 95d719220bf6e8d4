//! Breathing-gas mixtures and the CCR loop-mix derivation.

use libm::{fabs, floor};

use crate::DecoError;

/// Fractions must sum to 1 within this tolerance.
const FRACTION_TOLERANCE: f64 = 1e-4;

/// Two mixes closer than this per fraction count as the same gas.
const SAME_MIX_TOLERANCE: f64 = 1e-3;

/// A breathing mix. `fn2` is derived so the fractions always sum to 1.
/// Deco gases additionally carry a maximum operating depth, which gates
/// where the scheduler may switch onto them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gas {
    fo2: f64,
    fhe: f64,
    fn2: f64,
    max_operating_depth: Option<f64>,
}

impl Gas {
    pub fn new(fo2: f64, fhe: f64) -> Result<Self, DecoError> {
        if !(0.0..=1.0).contains(&fo2) || !(0.0..=1.0).contains(&fhe) {
            return Err(DecoError::InvalidGas);
        }
        let fn2 = 1.0 - fo2 - fhe;
        if fn2 < -FRACTION_TOLERANCE {
            return Err(DecoError::InvalidGas);
        }
        Ok(Gas {
            fo2,
            fhe,
            fn2: fn2.max(0.0),
            max_operating_depth: None,
        })
    }

    pub fn with_mod(fo2: f64, fhe: f64, max_operating_depth: f64) -> Result<Self, DecoError> {
        let mut gas = Gas::new(fo2, fhe)?;
        gas.max_operating_depth = Some(max_operating_depth);
        Ok(gas)
    }

    /// Atmospheric air.
    pub fn air() -> Self {
        Gas {
            fo2: 0.21,
            fhe: 0.0,
            fn2: 0.79,
            max_operating_depth: None,
        }
    }

    pub fn fo2(&self) -> f64 {
        self.fo2
    }

    pub fn fhe(&self) -> f64 {
        self.fhe
    }

    pub fn fn2(&self) -> f64 {
        self.fn2
    }

    pub fn max_operating_depth(&self) -> Option<f64> {
        self.max_operating_depth
    }

    /// Breathable at `depth` (within MOD, if one is set).
    pub fn safe_at(&self, depth: f64) -> bool {
        match self.max_operating_depth {
            Some(max) => depth <= max + 1e-9,
            None => true,
        }
    }

    /// Deepest stop-grid depth at which this gas may be taken: the largest
    /// multiple of `stop_increment` not exceeding the MOD.
    pub fn switch_depth(&self, stop_increment: f64) -> Option<f64> {
        self.max_operating_depth
            .map(|max| floor(max / stop_increment) * stop_increment)
    }

    pub fn same_mix(&self, other: &Gas) -> bool {
        fabs(self.fo2 - other.fo2) < SAME_MIX_TOLERANCE
            && fabs(self.fhe - other.fhe) < SAME_MIX_TOLERANCE
    }
}

/// The mix actually breathed on a CCR loop at `amb_pressure` with the given
/// ppO2 `setpoint`: oxygen is held at the setpoint (capped by ambient) and
/// the remainder is inert gas in the diluent's He:N2 proportions.
pub fn effective_gas(amb_pressure: f64, setpoint: f64, diluent: &Gas) -> Result<Gas, DecoError> {
    let sp_eff = setpoint.min(amb_pressure);
    let fo2 = sp_eff / amb_pressure;
    let f_inert = 1.0 - fo2;
    let d_inert = diluent.fhe + diluent.fn2;
    if d_inert - f_inert <= FRACTION_TOLERANCE {
        return Err(DecoError::CannotDilute);
    }
    let fhe = f_inert * diluent.fhe / d_inert;
    Ok(Gas {
        fo2,
        fhe,
        fn2: f_inert - fhe,
        max_operating_depth: None,
    })
}

#[test]
fn test_air_fractions() {
    let air = Gas::air();
    assert_eq!(air.fo2(), 0.21);
    assert_eq!(air.fhe(), 0.0);
    assert_eq!(air.fn2(), 0.79);
}

#[test]
fn test_trimix_fn2_derived() {
    let tmx = Gas::new(0.18, 0.45).unwrap();
    assert!(fabs(tmx.fn2() - 0.37) < 1e-12);
}

#[test]
fn test_invalid_fractions_rejected() {
    assert_eq!(Gas::new(0.6, 0.5), Err(DecoError::InvalidGas));
    assert_eq!(Gas::new(-0.1, 0.0), Err(DecoError::InvalidGas));
    assert_eq!(Gas::new(1.2, 0.0), Err(DecoError::InvalidGas));
}

#[test]
fn test_switch_depth_snaps_to_grid() {
    let ean50 = Gas::with_mod(0.50, 0.0, 22.0).unwrap();
    assert_eq!(ean50.switch_depth(3.0), Some(21.0));
    let oxygen = Gas::with_mod(1.0, 0.0, 6.0).unwrap();
    assert_eq!(oxygen.switch_depth(3.0), Some(6.0));
}

#[test]
fn test_effective_gas_cannot_dilute() {
    // pure O2 diluent has no inert gas to fill the loop with
    let o2 = Gas::new(1.0, 0.0).unwrap();
    assert_eq!(effective_gas(4.0, 1.3, &o2), Err(DecoError::CannotDilute));
}
