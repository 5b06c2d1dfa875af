#[test]
fn nj_request_plain() {
    assert_cli::Assert::main_binary()
        .with_args(&["-r", "test_data/request_nj.json"])
        .stdout()
        .contains("** Sizing for Trenton, NJ")
        .stdout()
        .contains("Configurations evaluated: 6")
        .stdout()
        .contains("1. 6.0 kW PV + 0.0 kWh battery")
        .unwrap();
}

#[test]
fn nj_request_candidate_overrides() {
    assert_cli::Assert::main_binary()
        .with_args(&[
            "-r",
            "test_data/request_nj.json",
            "--pv",
            "3:7:1",
            "--battery",
            "0,5",
            "--top-k",
            "1",
        ])
        .stdout()
        .contains("Configurations evaluated: 10")
        .stdout()
        .doesnt_contain("2. ")
        .unwrap();
}

#[test]
fn nj_request_budget() {
    // 20k - 40k $ budget, 70 % for PV at 2800 $/kW: 5, 7.5 and 10 kW
    assert_cli::Assert::main_binary()
        .with_args(&["-r", "test_data/request_nj.json", "--budget", "medium"])
        .stdout()
        .contains("Configurations evaluated: 6")
        .stdout()
        .contains("7.5 kW PV")
        .unwrap();
}

#[test]
fn degraded_request_is_reported() {
    assert_cli::Assert::main_binary()
        .with_args(&["-r", "test_data/request_no_rate.json"])
        .stdout()
        .contains("** Data quality: degraded")
        .stdout()
        .contains("- 12 tariff period(s) without rate, priced at 0.150 $/kWh")
        .stdout()
        .contains("- location \"Unknown address\" was not resolved")
        .unwrap();
}

#[test]
fn json_report() {
    let path = std::env::temp_dir().join("solarsizer_test_report.json");
    let path_str = path.to_str().unwrap();
    assert_cli::Assert::main_binary()
        .with_args(&["-r", "test_data/request_nj.json", "--json", path_str])
        .succeeds()
        .unwrap();
    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"location_id\": \"Trenton, NJ\""));
    assert!(json.contains("\"status\": \"cost-effective\""));
}

#[test]
fn missing_request_file() {
    assert_cli::Assert::main_binary()
        .with_args(&["-r", "test_data/does_not_exist.json"])
        .fails_with(74)
        .stderr()
        .contains("Could not read the sizing request")
        .unwrap();
}

#[test]
fn invalid_efficiency() {
    assert_cli::Assert::main_binary()
        .with_args(&["-r", "test_data/request_nj.json", "--efficiency", "1.5"])
        .fails_with(65)
        .stderr()
        .contains("round trip efficiency")
        .unwrap();
}

#[test]
fn invalid_candidates() {
    assert_cli::Assert::main_binary()
        .with_args(&["-r", "test_data/request_nj.json", "--pv", "4;5"])
        .fails_with(64)
        .stderr()
        .contains("Invalid PV candidates")
        .unwrap();
}

#[test]
fn time_of_use_request() {
    assert_cli::Assert::main_binary()
        .with_args(&["-r", "test_data/request_tou.json"])
        .stdout()
        .contains("** Sizing for Phoenix, AZ")
        .stdout()
        .contains("bill 2680 -> ")
        .stdout()
        .doesnt_contain("Data quality")
        .unwrap();
}

#[test]
fn fallback_rate_below_export_rate() {
    assert_cli::Assert::main_binary()
        .with_args(&[
            "-r",
            "test_data/request_no_rate.json",
            "--fallback-rate",
            "0.04",
        ])
        .fails_with(65)
        .stderr()
        .contains("export rate")
        .unwrap();
}

#[test]
fn range_too_large() {
    assert_cli::Assert::main_binary()
        .with_args(&["-r", "test_data/request_nj.json", "--pv", "1:1e18:1"])
        .fails_with(64)
        .stderr()
        .contains("Invalid PV candidates")
        .unwrap();
}
