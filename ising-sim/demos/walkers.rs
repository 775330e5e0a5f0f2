use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use ising_sim::simulation::run_walkers_with_progress;
use ising_sim::{Lattice, WalkerConfig};

const N: usize = 20;
const STEPS: usize = 200;
const N_REPEATS: usize = 10;
const SEED: u64 = 2937053738;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let initial = Lattice::all_up(N)?;
    let config = WalkerConfig {
        temperatures: vec![10.0, 4.5, 3.0],
        n_repeats: N_REPEATS,
        steps: STEPS,
        stepsize: Some(N * N),
        base_seed: SEED,
        autocorrelation_max_lag: Some(20),
        sequential: false,
    };

    let pb = ProgressBar::new((config.temperatures.len() * N_REPEATS) as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}]",
        )?
        .progress_chars("=> "),
    );
    pb.set_message("walkers");

    let t0 = Instant::now();
    let results = run_walkers_with_progress(&initial, &config, &|| pb.inc(1))?;
    pb.finish();
    let elapsed = t0.elapsed().as_secs_f64();

    let flips_total = config.temperatures.len() * N_REPEATS * STEPS * N * N;
    println!(
        "Lattice: {N}x{N}  |  Temps: {:?}  |  Repeats: {N_REPEATS}  |  Samples: {STEPS}",
        config.temperatures
    );
    println!("{}", "-".repeat(70));
    println!(
        "{:>6} {:>10} {:>10} {:>10} {:>10} {:>8}",
        "T", "<m>", "<m^2>", "<E/N>", "accept", "tau(m2)"
    );
    for (t, &temp) in results.temperatures.iter().enumerate() {
        let accept = results.acceptance_rate[t].iter().sum::<f64>() / N_REPEATS as f64;
        println!(
            "{:>6.2} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>8.2}",
            temp,
            results.mags[t],
            results.mags2[t],
            results.energies[t],
            accept,
            results.mags2_tau[t]
        );
    }
    println!("{}", "-".repeat(70));
    println!(
        "Total: {:.3} s  |  {:.1} ns/flip",
        elapsed,
        elapsed * 1e9 / flips_total as f64
    );
    Ok(())
}
