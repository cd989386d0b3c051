// demos/dividend_pricing.rs
use chrono::NaiveDate;
use fast_mc_pricer::analytics::bs_analytic;
use fast_mc_pricer::math_utils::Timer;
use fast_mc_pricer::mc::mc_engine::EuropeanOptionAnalyzer;
use fast_mc_pricer::mc::payoffs::OptionType;
use fast_mc_pricer::models::{DividendSchedule, OptionContract};
use fast_mc_pricer::rng::StdNormalStream;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Running fast-mc-pricer discrete dividend demo\n");

    // S=50, K=55.55, seven months, σ=20%, r=2%
    let contract =
        OptionContract::new(50.0, 55.55, 7.0 / 12.0, 0.2, 0.02, 0.0).expect("Valid contract");
    let analyzer = EuropeanOptionAnalyzer::new(contract).expect("Valid contract");
    let mut stream = StdNormalStream::default();
    let paths = 1_000_000;

    // 2% proportional after four months, 0.50 cash after two and six months
    let valuation = NaiveDate::from_ymd_opt(2024, 1, 1).expect("Valid date");
    let date = |m: u32| NaiveDate::from_ymd_opt(2024, m, 1).expect("Valid date");
    let schedule = DividendSchedule::from_dates(
        valuation,
        &[(date(5), 0.02)],
        &[(date(3), 0.5), (date(7), 0.5)],
    )
    .expect("Valid schedule");

    println!("Simulation grid:");
    for step in schedule.steps(contract.maturity).expect("Valid schedule") {
        println!("  t = {:.4}  dt = {:.4}  dividend = {:?}", step.time, step.dt, step.dividend);
    }
    println!();

    for option_type in [OptionType::Call, OptionType::Put] {
        let mut timer = Timer::new();
        timer.start();
        let est = analyzer
            .price_with_dividends(&mut stream, option_type, &schedule, paths, 1)
            .expect("Valid configuration");
        let elapsed = timer.elapsed_ms();

        println!("--- {:?} ({:.1} ms) ---", option_type, elapsed);
        println!("No-dividend value (analytic): {:.6}", bs_analytic::price(contract, option_type));
        println!("No-dividend delta (analytic): {:.6}", bs_analytic::delta(contract, option_type));
        println!("Value:    {}", est.value);
        println!("CV value: {}", est.cv_value);
        println!("Delta:    {}", est.delta);
        println!("CV delta: {}", est.cv_delta);
        println!(
            "Variance reduction: value x{:.1}, delta x{:.1}\n",
            (est.value.std_error / est.cv_value.std_error).powi(2),
            (est.delta.std_error / est.cv_delta.std_error).powi(2)
        );
    }
}
