// tests/dividend_test.rs
use chrono::NaiveDate;
use fast_mc_pricer::analytics::bs_analytic;
use fast_mc_pricer::error::PricerError;
use fast_mc_pricer::mc::mc_engine::EuropeanOptionAnalyzer;
use fast_mc_pricer::mc::paths::PathGenerator;
use fast_mc_pricer::mc::payoffs::OptionType;
use fast_mc_pricer::models::{DividendKind, DividendSchedule, OptionContract};
use fast_mc_pricer::rng::{NormalSource, StdNormalStream};
use approx::assert_relative_eq;
use ndarray::Array2;

fn contract() -> OptionContract {
    OptionContract::new(50.0, 55.55, 7.0 / 12.0, 0.2, 0.02, 0.0).expect("Valid contract")
}

#[test]
fn test_schedule_merge_grid() {
    let schedule = DividendSchedule::from_pairs(
        &[(4.0 / 12.0, 0.02)],
        &[(2.0 / 12.0, 0.5), (6.0 / 12.0, 0.5)],
    )
    .expect("Valid schedule");
    let steps = schedule.steps(7.0 / 12.0).expect("Valid schedule");

    let boundaries: Vec<f64> = steps.iter().map(|s| s.time).collect();
    let lengths: Vec<f64> = steps.iter().map(|s| s.dt).collect();
    for (got, want) in boundaries.iter().zip([2.0, 4.0, 6.0, 7.0]) {
        assert_relative_eq!(*got, want / 12.0, epsilon = 1e-12);
    }
    for (got, want) in lengths.iter().zip([2.0, 2.0, 2.0, 1.0]) {
        assert_relative_eq!(*got, want / 12.0, epsilon = 1e-12);
    }
    assert_eq!(steps[0].dividend.map(|d| d.0), Some(DividendKind::Fixed));
    assert_eq!(steps[1].dividend.map(|d| d.0), Some(DividendKind::Proportional));
    assert_eq!(steps[3].dividend, None);
}

#[test]
fn test_proportional_dividends_match_scaled_spot() {
    // Proportional dividends only: S_T is the dividend-free S_T times Π(1 - d),
    // so the option is Black-Scholes on the spot S·Π(1 - d)
    let c = contract();
    let schedule =
        DividendSchedule::from_pairs(&[(0.2, 0.02), (0.45, 0.03)], &[]).expect("Valid schedule");
    let factor = 0.98 * 0.97;
    let scaled = c.with_spot(c.spot * factor);
    let analyzer = EuropeanOptionAnalyzer::new(c).expect("Valid contract");
    let mut stream = StdNormalStream::default();

    for option_type in [OptionType::Call, OptionType::Put] {
        let est = analyzer
            .price_with_dividends(&mut stream, option_type, &schedule, 400_000, 1)
            .expect("Valid configuration");
        let value = bs_analytic::price(scaled, option_type);
        let delta = factor * bs_analytic::delta(scaled, option_type);

        println!("\n{:?} value: {} / cv {} vs {}", option_type, est.value, est.cv_value, value);
        println!("{:?} delta: {} / cv {} vs {}", option_type, est.delta, est.cv_delta, delta);

        assert!(est.value.z_score(value).abs() < 4.0);
        assert!(est.cv_value.z_score(value).abs() < 4.0);
        assert!(est.delta.z_score(delta).abs() < 4.0);
        assert!(est.cv_delta.z_score(delta).abs() < 4.0);
    }
}

#[test]
fn test_control_variate_tightens_dividend_estimates() {
    let c = contract();
    let schedule = DividendSchedule::from_pairs(
        &[(4.0 / 12.0, 0.02)],
        &[(2.0 / 12.0, 0.5), (6.0 / 12.0, 0.5)],
    )
    .expect("Valid schedule");
    let analyzer = EuropeanOptionAnalyzer::new(c).expect("Valid contract");
    let mut stream = StdNormalStream::default();

    let est = analyzer
        .price_with_dividends(&mut stream, OptionType::Call, &schedule, 200_000, 1)
        .expect("Valid configuration");
    let [value, delta, cv_value, cv_delta] = est.as_array();
    println!("\nvalue {value:.6} delta {delta:.6} cv value {cv_value:.6} cv delta {cv_delta:.6}");

    assert!(est.cv_value.std_error < est.value.std_error);
    assert!(est.cv_delta.std_error < est.delta.std_error);
    assert!(est.cv_value.samples == 200_000);
    assert!((cv_value - value).abs() < 4.0 * est.value.std_error);

    // Dividends lower a call below its dividend-free value
    assert!(cv_value < bs_analytic::call_price(c));
    assert!(cv_delta > 0.0 && cv_delta < bs_analytic::call_delta(c));
}

#[test]
fn test_dividends_raise_put() {
    let c = contract();
    let schedule = DividendSchedule::from_pairs(&[], &[(0.25, 1.0)]).expect("Valid schedule");
    let analyzer = EuropeanOptionAnalyzer::new(c).expect("Valid contract");
    let mut stream = StdNormalStream::default();
    let est = analyzer
        .price_with_dividends(&mut stream, OptionType::Put, &schedule, 100_000, 2)
        .expect("Valid configuration");
    assert!(est.cv_value.value > bs_analytic::put_price(c));
    assert!(est.cv_delta.value < 0.0);
}

#[test]
fn test_dividend_pricing_is_deterministic() {
    let c = contract();
    let schedule =
        DividendSchedule::from_pairs(&[(0.1, 0.01)], &[(0.3, 0.4)]).expect("Valid schedule");
    let analyzer = EuropeanOptionAnalyzer::new(c).expect("Valid contract");
    let mut stream = StdNormalStream::default();
    let a = analyzer
        .price_with_dividends(&mut stream, OptionType::Call, &schedule, 10_000, 77)
        .expect("Valid configuration");
    let b = analyzer
        .price_with_dividends(&mut stream, OptionType::Call, &schedule, 10_000, 77)
        .expect("Valid configuration");
    assert_eq!(a, b);
}

#[test]
fn test_schedule_errors() {
    let c = contract();
    let analyzer = EuropeanOptionAnalyzer::new(c).expect("Valid contract");
    let mut stream = StdNormalStream::default();

    let late = DividendSchedule::from_pairs(&[(0.9, 0.02)], &[]).expect("Valid schedule");
    let err = analyzer
        .price_with_dividends(&mut stream, OptionType::Call, &late, 1_000, 1)
        .unwrap_err();
    assert!(matches!(err, PricerError::InvalidSchedule { .. }));
    assert!(err.is_precondition());

    assert!(DividendSchedule::from_pairs(&[(0.3, 0.02), (0.2, 0.02)], &[]).is_err());
    assert!(DividendSchedule::from_pairs(&[(0.3, 1.0)], &[]).is_err());
    assert!(DividendSchedule::from_pairs(&[], &[(0.3, -0.5)]).is_err());

    // Draw matrix whose width disagrees with the grid
    let schedule =
        DividendSchedule::from_pairs(&[(0.2, 0.02)], &[(0.4, 0.5)]).expect("Valid schedule");
    let generator = PathGenerator::new(&c);
    stream.reseed(1);
    let draws = stream.standard_normal_matrix(10, 2);
    assert_eq!(
        generator.dividend_paths(&draws, &schedule).unwrap_err(),
        PricerError::DimensionMismatch {
            context: "dividend paths".to_string(),
            expected: 3,
            actual: 2,
        }
    );
}

#[test]
fn test_schedule_from_calendar_dates() {
    let valuation = NaiveDate::from_ymd_opt(2024, 1, 1).expect("Valid date");
    let ex_date = NaiveDate::from_ymd_opt(2024, 4, 1).expect("Valid date");
    let schedule =
        DividendSchedule::from_dates(valuation, &[(ex_date, 0.02)], &[]).expect("Valid schedule");
    assert_relative_eq!(schedule.proportional()[0].time, 91.0 / 365.0, epsilon = 1e-12);
}

#[test]
fn test_cash_dividend_above_price_keeps_put_bounded() {
    // A cash dividend of 60 on a 50 stock exhausts nearly every path
    let c = OptionContract::new(50.0, 55.0, 0.5, 0.2, 0.02, 0.0).expect("Valid contract");
    let schedule = DividendSchedule::from_pairs(&[], &[(0.1, 60.0)]).expect("Valid schedule");
    let analyzer = EuropeanOptionAnalyzer::new(c).expect("Valid contract");
    let mut stream = StdNormalStream::default();

    let est = analyzer
        .price_with_dividends(&mut stream, OptionType::Put, &schedule, 10_000, 1)
        .expect("Valid configuration");
    let [value, delta, cv_value, cv_delta] = est.as_array();
    println!("\nvalue {value:.6} delta {delta:.6} cv value {cv_value:.6} cv delta {cv_delta:.6}");

    let bound = c.strike * c.discount_factor();
    assert!(value <= bound + 1e-12);
    assert!(value > 0.95 * bound);
    assert!(cv_value <= bound + 4.0 * est.cv_value.std_error);
    assert!(delta >= -1.0 && delta <= 0.0);
    assert!(cv_delta >= -1.0 - 4.0 * est.cv_delta.std_error);

    stream.reseed(1);
    let draws = stream.standard_normal_matrix(1_000, schedule.step_count());
    let paths = PathGenerator::new(&c)
        .dividend_paths(&draws, &schedule)
        .expect("Valid draws");
    assert!(paths.terminal_prices().iter().all(|&s| s >= 0.0));
}

#[test]
fn test_dividend_at_maturity_is_paid_before_expiry() {
    // A dividend dated exactly at T is paid on the last dividend node; the
    // appended maturity node has zero length and pays nothing
    let c = OptionContract::new(50.0, 55.0, 0.5, 0.2, 0.02, 0.0).expect("Valid contract");
    let schedule = DividendSchedule::from_pairs(&[], &[(0.5, 1.0)]).expect("Valid schedule");
    assert!(!schedule.is_empty());

    let steps = schedule.steps(c.maturity).expect("Valid schedule");
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[0].dividend, Some((DividendKind::Fixed, 1.0)));
    assert_eq!(steps[1].dt, 0.0);
    assert_eq!(steps[1].dividend, None);

    let generator = PathGenerator::new(&c);
    let draws = Array2::<f64>::zeros((1, 2));
    let paths = generator.dividend_paths(&draws, &schedule).expect("Valid draws");
    let path = paths.path(0).expect("One path");
    let grown = generator.model().exact_step(c.spot, c.maturity, 0.0);
    assert_eq!(path.len(), 3);
    assert_eq!(path[0], c.spot);
    assert_relative_eq!(path[1], grown - 1.0, epsilon = 1e-12);
    assert_relative_eq!(path[2], path[1], epsilon = 1e-12);

    let no_dividend = generator.no_dividend_terminals(&draws, &schedule).expect("Valid draws");
    assert_relative_eq!(no_dividend[0], grown, epsilon = 1e-12);
}
