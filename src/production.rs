// Copyright (c) 2026  The SolarSizer developers

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

/*!
Modelo de producción
====================

Production estimate for a PV capacity, scaled linearly from the reference
production profile, with best / base / conservative variants.

Uncertainty is a single parameter applied through the same scaling, so the three
bands always come from the same production shape.
*/

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    types::{validate_pv_capacity, validate_uncertainty, ProductionProfile, UncertaintyBand},
    vecops::{veckmul, vecsum},
};

/// Producción mensual de una instalación
///
/// Monthly production of a PV system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProduction {
    /// PV capacity [kW DC]
    pub capacity_kw: f64,
    /// Annual production [kWh]
    pub annual_kwh: f64,
    /// Production in each month [kWh]
    pub monthly_kwh: Vec<f64>,
}

/// Production estimate for the three uncertainty bands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionEstimate {
    /// Production above nominal by the uncertainty
    pub best: MonthlyProduction,
    /// Nominal production
    pub base: MonthlyProduction,
    /// Production below nominal by the uncertainty
    pub conservative: MonthlyProduction,
    /// Uncertainty used for the bands [%]
    pub uncertainty_pct: f64,
}

impl ProductionEstimate {
    /// Production for a band
    pub fn band(&self, band: UncertaintyBand) -> &MonthlyProduction {
        match band {
            UncertaintyBand::Best => &self.best,
            UncertaintyBand::Base => &self.base,
            UncertaintyBand::Conservative => &self.conservative,
        }
    }
}

/// Producción de una banda de incertidumbre
///
/// Production of a PV system of `capacity_kw` for an uncertainty band.
///
/// Production scales linearly with `capacity_kw / reference_capacity_kw` and keeps
/// the monthly fractions of the profile. The profile is assumed valid.
pub fn production_for_band(
    capacity_kw: f64,
    profile: &ProductionProfile,
    band: UncertaintyBand,
    uncertainty_pct: f64,
) -> MonthlyProduction {
    let scale = if profile.reference_capacity_kw > 0.0 {
        capacity_kw / profile.reference_capacity_kw
    } else {
        0.0
    };
    let annual = profile.annual_output_kwh * scale * band.factor(uncertainty_pct);
    let monthly_kwh = veckmul(&profile.monthly_fractions, annual);
    MonthlyProduction {
        capacity_kw,
        annual_kwh: vecsum(&monthly_kwh),
        monthly_kwh,
    }
}

/// Estima la producción de una instalación
///
/// Estimate production of a PV system of `capacity_kw` for the three bands.
///
/// # Errors
///
/// * Non positive `capacity_kw`, invalid profile or uncertainty out of [0, 100)
///
pub fn estimate_production(
    capacity_kw: f64,
    profile: &ProductionProfile,
    uncertainty_pct: f64,
) -> Result<ProductionEstimate> {
    validate_pv_capacity(capacity_kw)?;
    profile.validate()?;
    validate_uncertainty(uncertainty_pct)?;

    let variant = |band| production_for_band(capacity_kw, profile, band, uncertainty_pct);
    Ok(ProductionEstimate {
        best: variant(UncertaintyBand::Best),
        base: variant(UncertaintyBand::Base),
        conservative: variant(UncertaintyBand::Conservative),
        uncertainty_pct,
    })
}
