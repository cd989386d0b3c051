// demos/variance_reduction.rs
use fast_mc_pricer::analytics::bs_analytic;
use fast_mc_pricer::math_utils::Timer;
use fast_mc_pricer::mc::mc_engine::{
    EuropeanOptionAnalyzer, EuropeanOptionResults, McConfig, PricingMode,
};
use fast_mc_pricer::mc::parallel::{default_workers, mc_price_option_parallel};
use fast_mc_pricer::mc::path_engine::PathOptionAnalyzer;
use fast_mc_pricer::mc::payoffs::{BarrierDirection, BarrierStyle, OptionType, Payoff};
use fast_mc_pricer::models::OptionContract;
use fast_mc_pricer::rng::StdNormalStream;
use tracing_subscriber::EnvFilter;

const MODES: [PricingMode; 5] = [
    PricingMode::Vanilla,
    PricingMode::Antithetic,
    PricingMode::ControlVariate,
    PricingMode::MomentMatching,
    PricingMode::MomentMatchingControlVariate,
];

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let paths = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(1_000_000);

    println!("Running fast-mc-pricer variance reduction demo ({} paths)\n", paths);

    let contract = OptionContract::new(41.0, 42.0, 0.75, 0.25, 0.03, 0.01).expect("Valid contract");
    let analyzer = EuropeanOptionAnalyzer::new(contract).expect("Valid contract");
    let mut stream = StdNormalStream::default();
    let mut timer = Timer::new();

    // --- European Pricing ---
    for option_type in [OptionType::Call, OptionType::Put] {
        let exact = bs_analytic::price(contract, option_type);
        println!("--- European {:?} (analytic {:.6}) ---", option_type, exact);
        for mode in MODES {
            timer.start();
            let est = analyzer
                .estimate(&mut stream, option_type, mode, paths, 1)
                .expect("Valid configuration");
            println!(
                "{:<32} {}  z = {:+.2}  ({:.1} ms)",
                format!("{:?}", mode),
                est,
                est.z_score(exact),
                timer.elapsed_ms()
            );
        }
        println!();
    }

    // --- Pathwise Greeks ---
    println!("--- Pathwise Greeks ---");
    let mc = analyzer.analyze(&mut stream, paths, 1).expect("Valid configuration");
    let exact = EuropeanOptionResults::closed_form(contract);
    println!("{:<12} {:>12} {:>12}", "", "MC", "Analytic");
    for (name, a, b) in [
        ("call", mc.call, exact.call),
        ("delta call", mc.delta_call, exact.delta_call),
        ("vega call", mc.vega_call, exact.vega_call),
        ("put", mc.put, exact.put),
        ("delta put", mc.delta_put, exact.delta_put),
        ("vega put", mc.vega_put, exact.vega_put),
    ] {
        println!("{:<12} {:>12.6} {:>12.6}", name, a, b);
    }
    println!();

    // --- Barrier Pricing ---
    println!("--- Down-and-Out Call (K=42, H=36) ---");
    let down_and_out =
        Payoff::barrier(OptionType::Call, 42.0, 36.0, BarrierDirection::Down, BarrierStyle::Out);
    let barrier_analyzer = PathOptionAnalyzer::new(contract, down_and_out).expect("Valid payoff");
    match barrier_analyzer.closed_form() {
        Some(value) => println!("Continuous closed form: {:.6}", value),
        None => println!("Continuous closed form: unavailable"),
    }
    for steps in [12, 52, 252] {
        let est = barrier_analyzer
            .estimate(&mut stream, steps, paths / 10, PricingMode::ControlVariate, 1)
            .expect("Valid configuration");
        println!("{:>4} monitoring dates: {}", steps, est);
    }
    println!();

    // --- Parallel Asian Pricing ---
    let workers = default_workers();
    println!("--- Arithmetic Asian Call, {} workers ---", workers);
    let asian = Payoff::asian(OptionType::Call, 42.0, false);
    let cfg = McConfig {
        paths,
        steps: 52,
        seed: 1,
        mode: PricingMode::Antithetic,
    };
    timer.start();
    let est =
        mc_price_option_parallel(&contract, &asian, &cfg, workers).expect("Valid configuration");
    println!("Asian call: {} ({:.1} ms)", est, timer.elapsed_ms());
}
