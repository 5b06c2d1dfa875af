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
Balance energético
==================

Energy flows of a PV + battery system for a household load, by period (month):
self consumption, grid import, grid export and battery cycling.

For each period:

1. surplus = production - load
2. a surplus charges the battery (stored energy = charged energy x round trip
   efficiency) up to its usable capacity and the remainder is exported
3. a deficit discharges the battery down to an empty state of charge and the
   remainder is imported from the grid
4. self consumption = load - grid import

The battery starts empty and its state of charge carries over between periods of
the same run. Every run is independent of any other.
*/

use serde::{Deserialize, Serialize};

use crate::{
    defaults::HOURS_PER_YEAR,
    production::MonthlyProduction,
    types::{LoadAssumption, SystemConfiguration},
    vecops::{vecsum, vecvecdif},
};

/// Flujos de energía de una instalación
///
/// Energy flows by period plus annual totals [kWh]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyFlow {
    /// Produced energy in each period
    pub produced: Vec<f64>,
    /// Consumed energy in each period
    pub used: Vec<f64>,
    /// Consumed energy covered by PV or battery in each period
    pub self_consumed: Vec<f64>,
    /// Energy imported from the grid in each period
    pub imported: Vec<f64>,
    /// Energy exported to the grid in each period
    pub exported: Vec<f64>,
    /// Energy taken from the PV surplus to charge the battery in each period
    pub charged: Vec<f64>,
    /// Energy delivered by the battery in each period
    pub discharged: Vec<f64>,
    /// Battery state of charge at the end of each period
    pub soc: Vec<f64>,
    /// Produced energy
    pub produced_an: f64,
    /// Consumed energy
    pub used_an: f64,
    /// Self consumed energy
    pub self_consumed_an: f64,
    /// Imported energy
    pub imported_an: f64,
    /// Exported energy
    pub exported_an: f64,
}

impl EnergyFlow {
    fn with_totals(mut self) -> Self {
        self.produced_an = vecsum(&self.produced);
        self.used_an = vecsum(&self.used);
        self.self_consumed_an = vecsum(&self.self_consumed);
        self.imported_an = vecsum(&self.imported);
        self.exported_an = vecsum(&self.exported);
        self
    }

    /// Share of the load covered by the system [0, 1], 0 without load
    pub fn self_sufficiency(&self) -> f64 {
        if self.used_an > 0.0 {
            self.self_consumed_an / self.used_an
        } else {
            0.0
        }
    }
}

/// Simula los flujos de energía de una configuración
///
/// Simulate energy flows for a system configuration.
///
/// * `config` - PV + battery configuration (battery capacity is used here)
/// * `production` - production of the PV system by period
/// * `load` - household load
/// * `round_trip_efficiency` - battery round trip efficiency (0, 1]
pub fn simulate(
    config: &SystemConfiguration,
    production: &MonthlyProduction,
    load: &LoadAssumption,
    round_trip_efficiency: f64,
) -> EnergyFlow {
    let used = load.monthly_kwh();
    let produced = production.monthly_kwh.clone();
    let surplus = vecvecdif(&produced, &used);
    let capacity = config.battery_kwh.max(0.0);

    let nsteps = surplus.len();
    let mut flow = EnergyFlow {
        self_consumed: Vec::with_capacity(nsteps),
        imported: Vec::with_capacity(nsteps),
        exported: Vec::with_capacity(nsteps),
        charged: Vec::with_capacity(nsteps),
        discharged: Vec::with_capacity(nsteps),
        soc: Vec::with_capacity(nsteps),
        ..Default::default()
    };

    let mut soc = 0.0_f64;
    for (step, &surplus_t) in surplus.iter().enumerate() {
        let used_t = *used.get(step).unwrap_or(&0.0);
        let (charged_t, discharged_t, exported_t, imported_t) = if surplus_t > 0.0 {
            let room = capacity - soc;
            let charged_t = if round_trip_efficiency > 0.0 && room > 0.0 {
                surplus_t.min(room / round_trip_efficiency)
            } else {
                0.0
            };
            soc = (soc + charged_t * round_trip_efficiency).min(capacity);
            (charged_t, 0.0, surplus_t - charged_t, 0.0)
        } else if surplus_t < 0.0 {
            let deficit = -surplus_t;
            let discharged_t = deficit.min(soc);
            soc = (soc - discharged_t).max(0.0);
            (0.0, discharged_t, 0.0, deficit - discharged_t)
        } else {
            // Balanced or degenerate (no load and no production) period
            (0.0, 0.0, 0.0, 0.0)
        };
        flow.charged.push(charged_t);
        flow.discharged.push(discharged_t);
        flow.exported.push(exported_t);
        flow.imported.push(imported_t);
        flow.self_consumed.push(used_t - imported_t);
        flow.soc.push(soc);
    }

    flow.produced = produced;
    flow.used = used;
    flow.with_totals()
}

/// Flujos con compra y venta total
///
/// Energy flows under buy-all-sell-all: all production is exported, all load is
/// imported and the battery stays idle.
pub fn buy_all_sell_all(production: &MonthlyProduction, load: &LoadAssumption) -> EnergyFlow {
    let used = load.monthly_kwh();
    let produced = production.monthly_kwh.clone();
    let zeros = vec![0.0; produced.len()];
    EnergyFlow {
        self_consumed: zeros.clone(),
        imported: used.clone(),
        exported: produced.clone(),
        charged: zeros.clone(),
        discharged: zeros.clone(),
        soc: zeros,
        produced,
        used,
        ..Default::default()
    }
    .with_totals()
}

/// Horas de autonomía de la batería
///
/// Hours the battery alone can supply the critical share of the average demand:
///
/// backup_hours = battery_kwh / (annual_load_kwh x critical_load_fraction / 8760)
///
/// Returns 0 without battery or without critical load.
pub fn backup_hours(battery_kwh: f64, critical_load_fraction: f64, annual_load_kwh: f64) -> f64 {
    let critical_kw = annual_load_kwh * critical_load_fraction / HOURS_PER_YEAR;
    if battery_kwh <= 0.0 || critical_kw <= 0.0 {
        return 0.0;
    }
    battery_kwh / critical_kw
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn production(monthly_kwh: Vec<f64>) -> MonthlyProduction {
        MonthlyProduction {
            capacity_kw: 5.0,
            annual_kwh: monthly_kwh.iter().sum(),
            monthly_kwh,
        }
    }

    fn load(annual: f64) -> LoadAssumption {
        LoadAssumption::even(annual, 0.5)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn balance_without_battery() {
        let prod = production(vec![
            500.0, 500.0, 800.0, 1200.0, 1200.0, 1200.0, 1200.0, 1200.0, 800.0, 500.0, 500.0, 400.0,
        ]);
        let flow = simulate(&SystemConfiguration::new(5.0, 0.0), &prod, &load(12_000.0), 0.92);
        assert!(approx(flow.imported[0], 500.0));
        assert!(approx(flow.exported[3], 200.0));
        assert!(approx(flow.self_consumed[3], 1000.0));
        assert!(approx(flow.imported_an, 500.0 * 4.0 + 200.0 * 2.0 + 600.0));
        assert!(approx(flow.exported_an, 200.0 * 5.0));
        assert!(flow.charged.iter().all(|v| *v == 0.0));
        for step in 0..12 {
            assert!(approx(flow.used[step], flow.self_consumed[step] + flow.imported[step]));
        }
    }

    #[test]
    fn balance_battery_cycling() {
        // Surplus in the first period, deficit in the second one
        let mut monthly = vec![1000.0; 12];
        monthly[0] = 1100.0;
        monthly[1] = 900.0;
        let prod = production(monthly);
        let flow = simulate(&SystemConfiguration::new(5.0, 10.0), &prod, &load(12_000.0), 0.8);
        // 10 kWh room needs 12.5 kWh of surplus at 80 % efficiency
        assert!(approx(flow.charged[0], 12.5));
        assert!(approx(flow.exported[0], 87.5));
        assert!(approx(flow.soc[0], 10.0));
        assert!(approx(flow.discharged[1], 10.0));
        assert!(approx(flow.imported[1], 90.0));
        assert!(approx(flow.soc[1], 0.0));
        assert!(approx(flow.self_consumed[1], 910.0));
    }

    #[test]
    fn balance_degenerate_period() {
        let flow = simulate(
            &SystemConfiguration::new(5.0, 10.0),
            &production(vec![0.0; 12]),
            &load(0.0),
            0.92,
        );
        assert_eq!(flow.imported, vec![0.0; 12]);
        assert_eq!(flow.exported, vec![0.0; 12]);
        assert_eq!(flow.self_sufficiency(), 0.0);
        assert!(flow.self_consumed.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn balance_runs_are_independent() {
        let prod = production(vec![1200.0; 12]);
        let config = SystemConfiguration::new(5.0, 10.0);
        let first = simulate(&config, &prod, &load(12_000.0), 0.92);
        let second = simulate(&config, &prod, &load(12_000.0), 0.92);
        assert_eq!(first, second);
    }

    #[test]
    fn balance_buy_all_sell_all() {
        let prod = production(vec![600.0; 12]);
        let flow = buy_all_sell_all(&prod, &load(12_000.0));
        assert!(approx(flow.imported_an, 12_000.0));
        assert!(approx(flow.exported_an, 7200.0));
        assert_eq!(flow.self_consumed_an, 0.0);
    }

    #[test]
    fn backup_hours_cases() {
        assert_eq!(backup_hours(0.0, 0.5, 8760.0), 0.0);
        assert_eq!(backup_hours(0.0, 0.0, 0.0), 0.0);
        assert_eq!(backup_hours(10.0, 0.0, 8760.0), 0.0);
        // 8760 kWh/yr -> 1 kW average, half of it critical
        assert!(approx(backup_hours(10.0, 0.5, 8760.0), 20.0));
    }
}
