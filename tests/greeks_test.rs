// tests/greeks_test.rs
use fast_mc_pricer::analytics::bs_analytic;
use fast_mc_pricer::mc::mc_engine::{EuropeanOptionAnalyzer, EuropeanOptionResults};
use fast_mc_pricer::models::OptionContract;
use fast_mc_pricer::rng::StdNormalStream;

fn check(name: &str, mc: f64, analytic: f64, tolerance: f64) {
    let rel_error = (mc - analytic).abs() / analytic.abs();
    println!("{name}: MC {mc:.6}, analytic {analytic:.6}, relative error {rel_error:.2e}");
    assert!(rel_error < tolerance, "Relative error for {name} exceeds {tolerance}: {rel_error}");
}

#[test]
fn test_analyze_vs_analytic() {
    // S=50, K=55.55, T=7 months, σ=20%, r=2%
    let contract =
        OptionContract::new(50.0, 55.55, 7.0 / 12.0, 0.2, 0.02, 0.0).expect("Valid contract");
    let analyzer = EuropeanOptionAnalyzer::new(contract).expect("Valid contract");
    let mut stream = StdNormalStream::default();

    let mc = analyzer.analyze(&mut stream, 1_000_000, 42).expect("Valid configuration");
    let exact = EuropeanOptionResults::closed_form(contract);

    println!();
    check("call", mc.call, exact.call, 0.02);
    check("delta call", mc.delta_call, exact.delta_call, 0.01);
    check("vega call", mc.vega_call, exact.vega_call, 0.01);
    check("put", mc.put, exact.put, 0.01);
    check("delta put", mc.delta_put, exact.delta_put, 0.01);
    check("vega put", mc.vega_put, exact.vega_put, 0.01);
}

#[test]
fn test_analyze_with_dividend_yield() {
    let contract = OptionContract::new(41.0, 42.0, 0.75, 0.25, 0.03, 0.01).expect("Valid contract");
    let analyzer = EuropeanOptionAnalyzer::new(contract).expect("Valid contract");
    let mut stream = StdNormalStream::default();

    let mc = analyzer.analyze(&mut stream, 1_000_000, 7).expect("Valid configuration");

    println!();
    check("delta call", mc.delta_call, bs_analytic::call_delta(contract), 0.01);
    check("delta put", mc.delta_put, bs_analytic::put_delta(contract), 0.01);
    check("vega", mc.vega_call, bs_analytic::vega(contract), 0.01);
    assert!(mc.delta_put < 0.0);
    assert!(mc.vega_put > 0.0);
}

#[test]
fn test_analyze_matches_pricing_draws() {
    use fast_mc_pricer::mc::mc_engine::PricingMode;
    use fast_mc_pricer::mc::payoffs::OptionType;

    let contract = OptionContract::new(100.0, 100.0, 1.0, 0.2, 0.05, 0.0).expect("Valid contract");
    let analyzer = EuropeanOptionAnalyzer::new(contract).expect("Valid contract");
    let mut stream = StdNormalStream::default();

    let results = analyzer.analyze(&mut stream, 10_000, 3).expect("Valid configuration");
    let call = analyzer
        .price(&mut stream, OptionType::Call, PricingMode::Vanilla, 10_000, 3)
        .expect("Valid configuration");
    approx::assert_relative_eq!(results.call, call, max_relative = 1e-12);
}

#[test]
fn test_closed_form_vega_reference() {
    let contract = OptionContract::new(100.0, 100.0, 1.0, 0.2, 0.05, 0.0).expect("Valid contract");
    let expected_vega = 37.52403469169379;
    let vega = bs_analytic::vega(contract);
    println!("\nAnalytic Vega: {}", vega);
    assert!((vega - expected_vega).abs() < 1e-9);
}
