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
Búsqueda de escenarios
======================

Sizing recommender: sweeps the PV x battery grid under the three uncertainty
bands, evaluates each cell through the production, energy balance, tariff and
cost models and ranks the cells of each band.

Evaluation cost is O(|pv_candidates| x |battery_candidates| x 3). There is no
implicit limit on the grid size: callers should keep it to a few hundred cells.

Each cell is a pure function of the request, so cells are evaluated in parallel
and merged by index. Output does not depend on evaluation order.
*/

use std::cmp::Ordering;

use itertools::iproduct;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    balance::{backup_hours, buy_all_sell_all, simulate, EnergyFlow},
    cost::{estimate_cost, srec_revenue},
    defaults::{
        BudgetRange, DEFAULT_FALLBACK_RATE, DEFAULT_ROUND_TRIP_EFFICIENCY, DEFAULT_TOP_K,
        MAX_RANGE_CANDIDATES, PV_BUDGET_SHARE,
    },
    error::{invalid, Result},
    finance::{project, CashFlowBasis, FinancialAssumptions, LifetimeProjection},
    production::production_for_band,
    report::{BandStatus, DataQuality, DataQualityIssue, RecommendationBand, SizingReport},
    tariff::price_energy,
    types::{
        validate_non_negative, validate_pv_capacity, validate_uncertainty, CostAssumptions,
        DgRule, LoadAssumption, Location, ProductionProfile, SystemConfiguration, TariffSchedule,
        UncertaintyBand, BANDS,
    },
};

/// Opciones del dimensionado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingOptions {
    /// Number of configurations recommended per band
    pub top_k: usize,
    /// Battery round trip efficiency (0, 1]
    pub round_trip_efficiency: f64,
    /// Import rate used when the tariff has no rate for a period [$/kWh]
    pub fallback_rate: f64,
    /// Longest simple payback still considered cost effective [years]
    pub max_payback_years: f64,
    /// Lifetime projection parameters
    pub finance: FinancialAssumptions,
}

impl Default for SizingOptions {
    fn default() -> Self {
        let finance = FinancialAssumptions::default();
        Self {
            top_k: DEFAULT_TOP_K,
            round_trip_efficiency: DEFAULT_ROUND_TRIP_EFFICIENCY,
            fallback_rate: DEFAULT_FALLBACK_RATE,
            max_payback_years: f64::from(finance.analysis_years),
            finance,
        }
    }
}

impl SizingOptions {
    /// Check options
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return invalid("at least one configuration must be recommended per band");
        }
        if !(self.round_trip_efficiency > 0.0 && self.round_trip_efficiency <= 1.0) {
            return invalid(format!(
                "round trip efficiency must be in (0, 1] and is {}",
                self.round_trip_efficiency
            ));
        }
        if !(self.fallback_rate.is_finite() && self.fallback_rate > 0.0) {
            return invalid(format!(
                "fallback rate must be positive and is {}",
                self.fallback_rate
            ));
        }
        if !(self.max_payback_years > 0.0) {
            return invalid(format!(
                "maximum payback must be positive and is {}",
                self.max_payback_years
            ));
        }
        self.finance.validate()
    }
}

/// Datos de una petición de dimensionado
///
/// Sizing request: every input of `recommend`, already resolved by the calling layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingRequest {
    /// Household location
    pub location: Location,
    /// Production profile at the location
    pub production: ProductionProfile,
    /// Household tariff
    pub tariff: TariffSchedule,
    /// Installed cost and incentives
    pub costs: CostAssumptions,
    /// Household load
    pub load: LoadAssumption,
    /// PV capacities to evaluate [kW]
    pub pv_candidates: Vec<f64>,
    /// Usable battery capacities to evaluate [kWh]
    pub battery_candidates: Vec<f64>,
    /// Production uncertainty [%], overrides the one in the production profile
    #[serde(default)]
    pub uncertainty_pct: Option<f64>,
    /// Sizing options
    #[serde(default)]
    pub options: SizingOptions,
}

impl SizingRequest {
    /// Uncertainty used for the bands [%]
    pub fn effective_uncertainty_pct(&self) -> f64 {
        self.uncertainty_pct
            .unwrap_or(self.production.uncertainty_pct)
    }

    /// Comprueba los datos de la petición
    ///
    /// Check every input before any simulation is run.
    pub fn validate(&self) -> Result<()> {
        self.location.validate()?;
        self.production.validate()?;
        self.tariff.validate()?;
        self.costs.validate()?;
        self.load.validate()?;
        self.options.validate()?;
        validate_uncertainty(self.effective_uncertainty_pct())?;
        if self.pv_candidates.is_empty() {
            return invalid("no PV capacity candidates");
        }
        if self.battery_candidates.is_empty() {
            return invalid("no battery capacity candidates (use 0 for PV only systems)");
        }
        for &pv_kw in &self.pv_candidates {
            validate_pv_capacity(pv_kw)?;
        }
        for &battery_kwh in &self.battery_candidates {
            validate_non_negative("battery capacity", battery_kwh)?;
        }
        Ok(())
    }

    /// Candidate configurations, PV major order
    pub fn grid(&self) -> Vec<SystemConfiguration> {
        iproduct!(self.pv_candidates.iter(), self.battery_candidates.iter())
            .map(|(&pv_kw, &battery_kwh)| SystemConfiguration::new(pv_kw, battery_kwh))
            .collect()
    }
}

/// Resultado de un escenario
///
/// Result for one configuration under one uncertainty band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Uncertainty band
    pub band: UncertaintyBand,
    /// Evaluated configuration
    pub config: SystemConfiguration,
    /// Annual production [kWh]
    pub annual_production_kwh: f64,
    /// Annual self consumed energy [kWh]
    pub self_consumed_kwh: f64,
    /// Annual exported energy [kWh]
    pub exported_kwh: f64,
    /// Annual energy imported from the grid [kWh]
    pub imported_kwh: f64,
    /// Annual bill without the system [$]
    pub bill_before: f64,
    /// Annual bill with the system [$]
    pub bill_after: f64,
    /// Value of the exported energy [$]
    pub export_credit: f64,
    /// Annual savings, bill reduction plus SREC revenue [$]
    pub annual_savings: f64,
    /// Annual SREC revenue [$]
    pub srec_revenue: f64,
    /// Installed cost before incentives [$]
    pub gross_cost: f64,
    /// Installed cost after the tax credit [$]
    pub net_cost: f64,
    /// Simple payback [years], infinite when there are no savings (null in JSON)
    #[serde(with = "payback_serde")]
    pub simple_payback_years: f64,
    /// Hours the battery can supply the critical load
    pub backup_hours: f64,
    /// Energy flows by period
    pub flow: EnergyFlow,
    /// Lifetime cash flow projection
    pub projection: LifetimeProjection,
}

impl ScenarioResult {
    /// Payback is finite and not longer than `max_payback_years`
    pub fn is_cost_effective(&self, max_payback_years: f64) -> bool {
        self.simple_payback_years.is_finite() && self.simple_payback_years <= max_payback_years
    }
}

mod payback_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(std::f64::INFINITY))
    }
}

// Paybacks equal to the microyear are ties, so that tie breakers are not decided by
// rounding noise between proportional configurations
fn payback_key(payback: f64) -> f64 {
    if payback.is_finite() {
        (payback * 1e6).round() / 1e6
    } else {
        std::f64::INFINITY
    }
}

/// Orden de los escenarios
///
/// Ranking: payback ascending, backup hours descending, net cost ascending and then
/// PV and battery capacities ascending, so that the order is total.
pub fn rank_order(a: &ScenarioResult, b: &ScenarioResult) -> Ordering {
    payback_key(a.simple_payback_years)
        .total_cmp(&payback_key(b.simple_payback_years))
        .then_with(|| b.backup_hours.total_cmp(&a.backup_hours))
        .then_with(|| a.net_cost.total_cmp(&b.net_cost))
        .then_with(|| a.config.pv_kw.total_cmp(&b.config.pv_kw))
        .then_with(|| a.config.battery_kwh.total_cmp(&b.config.battery_kwh))
}

/// Inputs shared by all the cells of a request
struct SizingContext<'a> {
    request: &'a SizingRequest,
    tariff: TariffSchedule,
    uncertainty_pct: f64,
    baseline_bill: f64,
}

/// Evalúa una celda de la rejilla
fn evaluate_cell(
    ctx: &SizingContext<'_>,
    band: UncertaintyBand,
    config: SystemConfiguration,
) -> Result<ScenarioResult> {
    let request = ctx.request;
    let load = &request.load;
    let costs = &request.costs;

    let production = production_for_band(
        config.pv_kw,
        &request.production,
        band,
        ctx.uncertainty_pct,
    );
    let flow = match ctx.tariff.dg_rule {
        DgRule::BuyAllSellAll => buy_all_sell_all(&production, load),
        _ => simulate(
            &config,
            &production,
            load,
            request.options.round_trip_efficiency,
        ),
    };
    let billing = price_energy(&flow.imported, &flow.exported, &ctx.tariff)?;
    let cost = estimate_cost(config.pv_kw, config.battery_kwh, costs);
    let srec = srec_revenue(production.annual_kwh, costs);

    let bill_savings = ctx.baseline_bill - billing.bill_after;
    let annual_savings = bill_savings + srec;
    let simple_payback_years = if annual_savings > 0.0 {
        cost.net / annual_savings
    } else {
        std::f64::INFINITY
    };

    let projection = project(
        &CashFlowBasis {
            net_cost: cost.net,
            bill_savings,
            srec_revenue: srec,
            production_kwh: production.annual_kwh,
            battery_cost: config.battery_kwh * costs.battery_cost_per_kwh,
        },
        &request.options.finance,
    );

    Ok(ScenarioResult {
        band,
        config,
        annual_production_kwh: production.annual_kwh,
        self_consumed_kwh: flow.self_consumed_an,
        exported_kwh: flow.exported_an,
        imported_kwh: flow.imported_an,
        bill_before: ctx.baseline_bill,
        bill_after: billing.bill_after,
        export_credit: billing.export_credit,
        annual_savings,
        srec_revenue: srec,
        gross_cost: cost.gross,
        net_cost: cost.net,
        simple_payback_years,
        backup_hours: backup_hours(
            config.battery_kwh,
            load.critical_load_fraction,
            load.annual_consumption_kwh,
        ),
        flow,
        projection,
    })
}

/// Selecciona las configuraciones recomendadas de una banda
///
/// Top `top_k` cost effective cells in rank order or, when there are none, the single
/// cell with the highest savings flagged as not cost effective.
pub fn select_band(
    band: UncertaintyBand,
    results: &[ScenarioResult],
    top_k: usize,
    max_payback_years: f64,
) -> RecommendationBand {
    let mut ranked: Vec<&ScenarioResult> = results
        .iter()
        .filter(|r| r.band == band && r.is_cost_effective(max_payback_years))
        .collect();
    ranked.sort_by(|a, b| rank_order(a, b));

    if !ranked.is_empty() {
        return RecommendationBand {
            band,
            status: BandStatus::CostEffective,
            entries: ranked.into_iter().take(top_k).cloned().collect(),
        };
    }

    // First cell in grid order with the highest savings
    let fallback = results
        .iter()
        .filter(|r| r.band == band)
        .fold(None, |best: Option<&ScenarioResult>, r| match best {
            Some(b) if b.annual_savings >= r.annual_savings => Some(b),
            _ => Some(r),
        });
    RecommendationBand {
        band,
        status: BandStatus::NoCostEffectiveConfiguration,
        entries: fallback.into_iter().cloned().collect(),
    }
}

/// Recomienda configuraciones PV + batería
///
/// Evaluate the PV x battery grid under the best, base and conservative bands and
/// recommend the best configurations of each band.
///
/// # Errors
///
/// * `InputValidation` for invalid inputs, before any simulation is run, including
///   export rates above the fallback rate once missing rates are filled
///
/// Missing tariff rates, an unresolved location and bands without cost effective
/// configurations are not errors: they are reported in the data quality record.
pub fn recommend(request: &SizingRequest) -> Result<SizingReport> {
    request.validate()?;

    let mut data_quality = DataQuality::default();
    if !request.location.resolved {
        warn!(location = %request.location.id, "location was not resolved by the geocoder");
        data_quality.push(DataQualityIssue::UnresolvedLocation {
            id: request.location.id.clone(),
        });
    }

    let options = &request.options;
    let (tariff, missing_periods) = request.tariff.resolve(options.fallback_rate)?;
    if !missing_periods.is_empty() {
        warn!(
            periods = ?missing_periods,
            fallback_rate = options.fallback_rate,
            "tariff has no rate for some periods, using fallback rate"
        );
        data_quality.push(DataQualityIssue::MissingRate {
            periods: missing_periods,
            fallback_rate: options.fallback_rate,
        });
    }

    let baseline = baseline_bill(&request.load, &tariff)?;
    let ctx = SizingContext {
        request,
        tariff,
        uncertainty_pct: request.effective_uncertainty_pct(),
        baseline_bill: baseline,
    };

    let grid = request.grid();
    let cells: Vec<(UncertaintyBand, SystemConfiguration)> =
        iproduct!(BANDS.iter(), grid.iter())
            .map(|(&band, &config)| (band, config))
            .collect();
    debug!(
        configurations = grid.len(),
        cells = cells.len(),
        uncertainty_pct = ctx.uncertainty_pct,
        "evaluating sizing grid"
    );

    let results = cells
        .into_par_iter()
        .map(|(band, config)| evaluate_cell(&ctx, band, config))
        .collect::<Result<Vec<ScenarioResult>>>()?;

    let select = |band| select_band(band, &results, options.top_k, options.max_payback_years);
    let best = select(UncertaintyBand::Best);
    let base = select(UncertaintyBand::Base);
    let conservative = select(UncertaintyBand::Conservative);
    for band in &[&best, &base, &conservative] {
        if band.status == BandStatus::NoCostEffectiveConfiguration {
            warn!(band = %band.band, "no cost effective configuration found");
            data_quality.push(DataQualityIssue::NoCostEffectiveConfiguration { band: band.band });
        }
    }

    Ok(SizingReport::new(
        request.location.id.clone(),
        ctx.uncertainty_pct,
        [best, base, conservative],
        results,
        data_quality,
    ))
}

/// Annual bill of the household without any system
fn baseline_bill(load: &LoadAssumption, tariff: &TariffSchedule) -> Result<f64> {
    let used = load.monthly_kwh();
    let zeros = vec![0.0; used.len()];
    Ok(price_energy(&used, &zeros, tariff)?.bill_after)
}

/// Candidatos de potencia a partir del presupuesto
///
/// PV capacities {min, mid, max} [kW] affordable with the PV share of a budget range.
pub fn pv_candidates_from_budget(budget: BudgetRange, pv_cost_per_kw: f64) -> Result<Vec<f64>> {
    if !(pv_cost_per_kw.is_finite() && pv_cost_per_kw > 0.0) {
        return invalid(format!("PV cost must be positive and is {}", pv_cost_per_kw));
    }
    if !(budget.min > 0.0 && budget.max >= budget.min) {
        return invalid(format!(
            "budget range must be positive and ordered and is {} - {}",
            budget.min, budget.max
        ));
    }
    let min_kw = budget.min * PV_BUDGET_SHARE / pv_cost_per_kw;
    let max_kw = budget.max * PV_BUDGET_SHARE / pv_cost_per_kw;
    Ok(vec![min_kw, 0.5 * (min_kw + max_kw), max_kw])
}

/// Values from `start` to `stop` (inclusive) every `step`
pub fn candidate_range(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if !(step.is_finite() && step > 0.0) {
        return invalid(format!("range step must be positive and is {}", step));
    }
    if !(start.is_finite() && stop.is_finite()) || stop < start {
        return invalid(format!("range must be ordered and is {} - {}", start, stop));
    }
    let nsteps = ((stop - start) / step + 1e-9).floor();
    if nsteps >= MAX_RANGE_CANDIDATES as f64 {
        return invalid(format!(
            "range {}:{}:{} gives more than {} candidates",
            start, stop, step, MAX_RANGE_CANDIDATES
        ));
    }
    let nsteps = nsteps as usize;
    Ok((0..=nsteps).map(|i| start + i as f64 * step).collect())
}

/// Lee una lista de candidatos
///
/// Parse candidates given as a list ("4, 5, 6") or as a range ("3:7:0.5").
pub fn parse_candidates(s: &str) -> Result<Vec<f64>> {
    let s = s.trim();
    if s.contains(':') {
        let parts = s
            .split(':')
            .map(|v| v.trim().parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()?;
        if parts.len() != 3 {
            return invalid(format!("range must be start:stop:step and is \"{}\"", s));
        }
        return candidate_range(parts[0], parts[1], parts[2]);
    }
    Ok(s.split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()?)
}
