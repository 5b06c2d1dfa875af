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
Informe de dimensionado
=======================

Recommendations by uncertainty band, the full evaluated grid and the data
quality record of a sizing run.
*/

use serde::{Deserialize, Serialize};

use crate::recommend::ScenarioResult;
use crate::types::{SystemConfiguration, UncertaintyBand};

/// Estado de las recomendaciones de una banda
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandStatus {
    /// Entries are cost effective configurations in rank order
    CostEffective,
    /// No configuration pays back; the only entry is the one with the highest savings
    NoCostEffectiveConfiguration,
}

/// Recomendaciones de una banda de incertidumbre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBand {
    /// Uncertainty band
    pub band: UncertaintyBand,
    /// Recommendation status
    pub status: BandStatus,
    /// Recommended configurations, best first
    pub entries: Vec<ScenarioResult>,
}

impl RecommendationBand {
    /// Top recommended configuration
    pub fn top(&self) -> Option<&ScenarioResult> {
        self.entries.first()
    }
}

/// Incidencia en la calidad de los datos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DataQualityIssue {
    /// Tariff periods without rate were priced at the fallback rate
    MissingRate {
        /// Periods priced at the fallback rate
        periods: Vec<usize>,
        /// Fallback rate [$/kWh]
        fallback_rate: f64,
    },
    /// The geocoder could not resolve the location
    UnresolvedLocation {
        /// Location identifier
        id: String,
    },
    /// A band has no cost effective configuration
    NoCostEffectiveConfiguration {
        /// Uncertainty band
        band: UncertaintyBand,
    },
}

/// Calidad de los datos del dimensionado
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQuality {
    /// Some result comes from degraded inputs or outcomes
    pub degraded: bool,
    /// Issues found
    pub issues: Vec<DataQualityIssue>,
}

impl DataQuality {
    /// Record an issue
    pub fn push(&mut self, issue: DataQualityIssue) {
        self.degraded = true;
        self.issues.push(issue);
    }

    /// Whether any issue was found
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// Informe de dimensionado
///
/// Result of a sizing run: top configurations for each band, every evaluated
/// cell (band major, PV major inside each band) and data quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingReport {
    /// Location identifier
    pub location_id: String,
    /// Production uncertainty used for the bands [%]
    pub uncertainty_pct: f64,
    /// Recommendations for the best band
    pub best: RecommendationBand,
    /// Recommendations for the base band
    pub base: RecommendationBand,
    /// Recommendations for the conservative band
    pub conservative: RecommendationBand,
    /// Every evaluated cell
    pub grid: Vec<ScenarioResult>,
    /// Data quality record
    pub data_quality: DataQuality,
}

impl SizingReport {
    /// Build a report from the bands in [best, base, conservative] order
    pub fn new(
        location_id: String,
        uncertainty_pct: f64,
        bands: [RecommendationBand; 3],
        grid: Vec<ScenarioResult>,
        data_quality: DataQuality,
    ) -> Self {
        let [best, base, conservative] = bands;
        Self {
            location_id,
            uncertainty_pct,
            best,
            base,
            conservative,
            grid,
            data_quality,
        }
    }

    /// Recommendations for a band
    pub fn band(&self, band: UncertaintyBand) -> &RecommendationBand {
        match band {
            UncertaintyBand::Best => &self.best,
            UncertaintyBand::Base => &self.base,
            UncertaintyBand::Conservative => &self.conservative,
        }
    }

    /// Evaluated cell for a band and configuration
    pub fn cell(
        &self,
        band: UncertaintyBand,
        config: SystemConfiguration,
    ) -> Option<&ScenarioResult> {
        self.grid
            .iter()
            .find(|r| r.band == band && r.config == config)
    }
}
