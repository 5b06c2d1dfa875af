use std::cmp::Ordering;
use std::fs::File;
use std::io::prelude::*;

use pretty_assertions::assert_eq;

use solarsizer::{types::*, *};

const SEASONAL: [f64; 12] = [
    0.05, 0.06, 0.08, 0.09, 0.10, 0.11, 0.11, 0.10, 0.09, 0.08, 0.07, 0.06,
];

fn profile(reference_capacity_kw: f64, annual_output_kwh: f64) -> ProductionProfile {
    ProductionProfile {
        reference_capacity_kw,
        annual_output_kwh,
        monthly_fractions: SEASONAL.to_vec(),
        capacity_factor: 0.165,
        uncertainty_pct: 10.0,
    }
}

fn costs(pv_cost_per_kw: f64, battery_cost_per_kwh: f64) -> CostAssumptions {
    CostAssumptions {
        pv_cost_per_kw,
        battery_cost_per_kwh,
        fixed_soft_costs: 0.0,
        credit_rate: 0.30,
        srec_price_per_mwh: 0.0,
        srec_eligible: false,
    }
}

/// 7235 kWh at 5 kW, $0.325 flat net metering, 10500 kWh load
fn nj_request() -> SizingRequest {
    SizingRequest {
        location: Location::new("Trenton, NJ", 40.22, -74.76, "NJ"),
        production: profile(5.0, 7235.0),
        tariff: TariffSchedule::flat(0.325, DgRule::NetMetering),
        costs: costs(2800.0, 800.0),
        load: LoadAssumption::even(10_500.0, 0.3),
        pv_candidates: vec![4.0, 5.0, 6.0],
        battery_candidates: vec![0.0, 10.0],
        uncertainty_pct: None,
        options: SizingOptions::default(),
    }
}

fn read_request(path: &str) -> SizingRequest {
    let mut contents = String::new();
    File::open(path)
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    serde_json::from_str(&contents).unwrap()
}

#[test]
fn production_scales_linearly_with_capacity() {
    let p = profile(5.0, 7235.0);
    for &capacity in &[1.0, 3.5, 8.0] {
        let single = estimate_production(capacity, &p, 10.0).unwrap();
        let triple = estimate_production(3.0 * capacity, &p, 10.0).unwrap();
        for band in BANDS.iter() {
            let s = single.band(*band);
            let t = triple.band(*band);
            assert!((t.annual_kwh - 3.0 * s.annual_kwh).abs() < 1e-6);
            for (tm, sm) in t.monthly_kwh.iter().zip(&s.monthly_kwh) {
                assert!((tm - 3.0 * sm).abs() < 1e-6);
            }
        }
    }
}

#[test]
fn payback_does_not_grow_with_pv_below_load() {
    // 1200 kWh/kW: 3 and 5 kW stay below the 8000 kWh load, 7 kW exceeds it
    let request = SizingRequest {
        production: profile(1.0, 1200.0),
        tariff: TariffSchedule::flat(0.15, DgRule::NetMetering),
        costs: costs(2500.0, 450.0),
        load: LoadAssumption::even(8000.0, 0.0),
        pv_candidates: vec![3.0, 5.0, 7.0],
        battery_candidates: vec![0.0],
        ..nj_request()
    };
    let report = recommend(&request).unwrap();
    let payback = |pv_kw| {
        report
            .cell(UncertaintyBand::Base, SystemConfiguration::new(pv_kw, 0.0))
            .unwrap()
            .simple_payback_years
    };
    assert!(payback(3.0).is_finite());
    assert!(payback(5.0) <= payback(3.0) + 1e-9);
    // Production above the load earns nothing after the annual true-up
    assert!(payback(7.0) > payback(5.0));
}

#[test]
fn no_battery_means_no_backup() {
    let mut request = nj_request();
    request.load.critical_load_fraction = 1.0;
    let report = recommend(&request).unwrap();
    for cell in &report.grid {
        if cell.config.battery_kwh == 0.0 {
            assert_eq!(cell.backup_hours, 0.0);
        } else {
            assert!(cell.backup_hours > 0.0);
        }
    }
}

#[test]
fn net_metering_credits_exports_at_retail() {
    let schedule = TariffSchedule::flat(0.20, DgRule::NetMetering);
    let mut imported = vec![100.0; 12];
    let mut exported = vec![0.0; 12];
    exported[6] = 500.0;
    let billing = price_energy(&imported, &exported, &schedule).unwrap();
    assert!((billing.export_credit - 100.0).abs() < 1e-9);
    assert!((billing.bill_before - 240.0).abs() < 1e-9);
    assert!((billing.bill_after - 140.0).abs() < 1e-9);
    // Credits beyond the bill are lost at the true-up
    imported = vec![0.0; 12];
    let billing = price_energy(&imported, &exported, &schedule).unwrap();
    assert_eq!(billing.bill_after, 0.0);
}

#[test]
fn ranking_is_a_total_order() {
    let mut request = nj_request();
    request.costs.fixed_soft_costs = 1500.0;
    request.pv_candidates = vec![3.0, 4.0, 5.0, 6.0];
    request.battery_candidates = vec![0.0, 5.0, 10.0];
    request.options.top_k = 100;
    let report = recommend(&request).unwrap();
    let entries = &report.base.entries;
    assert_eq!(report.base.status, BandStatus::CostEffective);
    assert_eq!(entries.len(), 12);
    for pair in entries.windows(2) {
        assert_eq!(rank_order(&pair[0], &pair[1]), Ordering::Less);
        assert!(pair[0].simple_payback_years <= pair[1].simple_payback_years + 1e-6);
    }
}

#[test]
fn recommend_is_deterministic() {
    let request = nj_request();
    let first = serde_json::to_string(&recommend(&request).unwrap()).unwrap();
    let second = serde_json::to_string(&recommend(&request).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unaffordable_pv_is_flagged_in_every_band() {
    let mut request = nj_request();
    request.costs.pv_cost_per_kw = 100_000.0;
    let report = recommend(&request).unwrap();
    for band in BANDS.iter() {
        let recommendation = report.band(*band);
        assert_eq!(
            recommendation.status,
            BandStatus::NoCostEffectiveConfiguration
        );
        assert_eq!(recommendation.entries.len(), 1);
        let top = &recommendation.entries[0];
        assert!(report
            .grid
            .iter()
            .filter(|r| r.band == *band)
            .all(|r| r.annual_savings <= top.annual_savings));
    }
    assert!(report.data_quality.is_degraded());
    assert_eq!(report.data_quality.issues.len(), 3);
}

#[test]
fn nj_household_end_to_end() {
    let report = recommend(&nj_request()).unwrap();
    assert_eq!(report.grid.len(), 18);
    assert!(!report.data_quality.is_degraded());
    assert!(report
        .grid
        .iter()
        .all(|r| r.simple_payback_years.is_finite()));

    // Without fixed costs PV only systems share the same payback and the cheapest wins
    let top = report.base.top().unwrap();
    assert_eq!(top.config, SystemConfiguration::new(4.0, 0.0));
    let expected = 0.7 * 2800.0 / (1447.0 * 0.325);
    assert!((top.simple_payback_years - expected).abs() < 1e-6);
    assert_eq!(report.base.entries.len(), 3);
    assert!(report
        .base
        .entries
        .iter()
        .all(|e| e.config.battery_kwh == 0.0));

    // 6 kW stays below the load: every kWh is worth the retail rate
    let cell = report
        .cell(UncertaintyBand::Base, SystemConfiguration::new(6.0, 0.0))
        .unwrap();
    assert!((cell.annual_production_kwh - 8682.0).abs() < 1e-6);
    assert!((cell.bill_before - 3412.5).abs() < 1e-6);
    assert!((cell.annual_savings - 8682.0 * 0.325).abs() < 1e-6);
    assert!((cell.net_cost - 11_760.0).abs() < 1e-6);
}

#[test]
fn nj_household_with_soft_costs_from_file() {
    let report = recommend(&read_request("test_data/request_nj.json")).unwrap();
    for band in BANDS.iter() {
        let recommendation = report.band(*band);
        assert_eq!(recommendation.status, BandStatus::CostEffective);
        assert_eq!(
            recommendation.top().unwrap().config,
            SystemConfiguration::new(6.0, 0.0)
        );
    }
    let pv: Vec<f64> = report.base.entries.iter().map(|e| e.config.pv_kw).collect();
    assert_eq!(pv, vec![6.0, 5.0, 4.0]);
}

#[test]
fn degraded_inputs_are_reported() {
    let report = recommend(&read_request("test_data/request_no_rate.json")).unwrap();
    assert!(report.data_quality.is_degraded());
    assert!(report
        .data_quality
        .issues
        .iter()
        .any(|i| *i == DataQualityIssue::UnresolvedLocation {
            id: "Unknown address".into()
        }));
    assert!(report.data_quality.issues.iter().any(|i| match i {
        DataQualityIssue::MissingRate {
            periods,
            fallback_rate,
        } => periods.len() == 12 && (*fallback_rate - 0.15).abs() < 1e-12,
        _ => false,
    }));
    let cell = report
        .cell(UncertaintyBand::Base, SystemConfiguration::new(3.0, 0.0))
        .unwrap();
    assert!((cell.bill_before - 9000.0 * 0.15).abs() < 1e-6);
}

#[test]
fn buy_all_sell_all_exports_everything() {
    let mut request = nj_request();
    request.tariff = TariffSchedule {
        export_rate: Some(0.10),
        ..TariffSchedule::flat(0.325, DgRule::BuyAllSellAll)
    };
    let report = recommend(&request).unwrap();
    let cell = report
        .cell(UncertaintyBand::Base, SystemConfiguration::new(5.0, 10.0))
        .unwrap();
    assert_eq!(cell.self_consumed_kwh, 0.0);
    assert!((cell.exported_kwh - 7235.0).abs() < 1e-6);
    assert!((cell.imported_kwh - 10_500.0).abs() < 1e-6);
    assert!((cell.bill_after - (10_500.0 * 0.325 - 7235.0 * 0.10)).abs() < 1e-6);
    assert!((cell.annual_savings - 723.5).abs() < 1e-6);
}

#[test]
fn net_billing_values_exports_below_retail() {
    let mut nem = nj_request();
    nem.pv_candidates = vec![6.0];
    nem.battery_candidates = vec![0.0];
    let mut nb = nem.clone();
    nb.tariff = TariffSchedule::flat(0.325, DgRule::NetBilling);
    let config = SystemConfiguration::new(6.0, 0.0);
    let nem_cell = recommend(&nem)
        .unwrap()
        .cell(UncertaintyBand::Base, config)
        .cloned()
        .unwrap();
    let nb_cell = recommend(&nb)
        .unwrap()
        .cell(UncertaintyBand::Base, config)
        .cloned()
        .unwrap();
    assert!(nb_cell.exported_kwh > 0.0);
    assert!((nb_cell.export_credit - 0.5 * 0.325 * nb_cell.exported_kwh).abs() < 1e-6);
    assert!(nb_cell.annual_savings < nem_cell.annual_savings);
}

#[test]
fn report_json_has_null_payback_when_never_recovered() {
    let mut request = nj_request();
    request.tariff = TariffSchedule::flat(0.325, DgRule::NoCredit);
    request.load = LoadAssumption::even(0.0, 0.0);
    let report = recommend(&request).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"simple_payback_years\":null"));
    let back: SizingReport = serde_json::from_str(&json).unwrap();
    assert!(back.grid[0].simple_payback_years.is_infinite());
}

#[test]
fn plain_summary() {
    let report = recommend(&read_request("test_data/request_nj.json")).unwrap();
    let plain = report.to_plain();
    assert!(plain.contains("** Sizing for Trenton, NJ"));
    assert!(plain.contains("Configurations evaluated: 6"));
    assert!(plain.contains("** Band base"));
    assert!(plain.contains("1. 6.0 kW PV + 0.0 kWh battery"));
}

#[test]
fn time_of_use_request_from_file() {
    let request = read_request("test_data/request_tou.json");
    // Summer periods from the table, the rest at the residential rate
    let rates: Vec<f64> = (0..12)
        .map(|p| request.tariff.import_rate(p).unwrap())
        .collect();
    assert_eq!(rates[5], 0.40);
    assert_eq!(rates[6], 0.45);
    assert_eq!(rates[0], 0.20);
    assert_eq!(rates[11], 0.20);

    let report = recommend(&request).unwrap();
    assert!(!report.data_quality.is_degraded());
    assert_eq!(report.grid.len(), 18);
    // 900 kWh at 0.40, 2 x 1000 kWh at 0.45 and 7100 kWh at 0.20
    let expected_before = 900.0 * 0.40 + 2000.0 * 0.45 + 7100.0 * 0.20;
    for cell in &report.grid {
        assert!((cell.bill_before - expected_before).abs() < 1e-6);
        // Net metering: every period priced at its own rate, netted over the year
        let net: f64 = cell
            .flow
            .imported
            .iter()
            .zip(&cell.flow.exported)
            .zip(&rates)
            .map(|((imp, exp), rate)| (imp - exp) * rate)
            .sum();
        assert!((cell.bill_after - net.max(0.0)).abs() < 1e-6);
    }
    assert_eq!(report.base.status, BandStatus::CostEffective);
}

#[test]
fn time_of_use_without_residential_rate_uses_fallback() {
    let mut request = read_request("test_data/request_tou.json");
    request.tariff.residential_rate = None;
    let report = recommend(&request).unwrap();
    assert!(report.data_quality.issues.contains(&DataQualityIssue::MissingRate {
        periods: vec![0, 1, 2, 3, 4, 8, 9, 10, 11],
        fallback_rate: 0.15,
    }));
    let cell = report
        .cell(UncertaintyBand::Base, SystemConfiguration::new(3.0, 0.0))
        .unwrap();
    let expected = 900.0 * 0.40 + 2000.0 * 0.45 + 7100.0 * 0.15;
    assert!((cell.bill_before - expected).abs() < 1e-6);
}

#[test]
fn fallback_rate_cannot_undercut_export_rate() {
    let mut request = nj_request();
    request.tariff = TariffSchedule {
        residential_rate: None,
        export_rate: Some(0.40),
        ..TariffSchedule::flat(0.0, DgRule::NetBilling)
    };
    match recommend(&request) {
        Err(error::SizingError::InputValidation(msg)) => assert!(msg.contains("export rate")),
        other => panic!("unexpected {:?}", other.map(|r| r.location_id)),
    }
}
