use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::error::{Result, SimError};
use super::history::{HistoricalSeries, bond_interest};
use super::sampler::ReturnSampler;
use super::types::{
    DistributionReport, HistogramBin, INITIAL_BALANCE, Inputs, MAX_ITERATIONS, MarketPath,
    RetirementWindow, Scenario, ScenarioDistribution,
};

/// Ending balance after drawing down `window` against one market path.
///
/// The first withdrawal comes out of the initial balance; each following
/// year grows equity by the path return plus dividends, grows bonds by that
/// year's yield, inflates the withdrawal, takes it out, and rebalances.
pub fn simulate_portfolio(
    history: &HistoricalSeries,
    path: &MarketPath,
    window: &RetirementWindow,
) -> Result<f64> {
    validate_window(window)?;
    let required = window.years_required();
    history.ensure_covers(required)?;
    if path.len() < required {
        return Err(SimError::InsufficientHistory {
            required,
            available: path.len(),
        });
    }

    let pct_equity = window.pct_equity;
    let mut withdrawal = INITIAL_BALANCE * window.withdrawal_rate;
    let mut balance = INITIAL_BALANCE - withdrawal;
    let mut equity = pct_equity * balance;
    let mut bond = (1.0 - pct_equity) * balance;

    for year in window.start_year..required {
        let shares = equity / path.prices[year];
        let equity_end = equity * (1.0 + path.returns[year]) + shares * history.dividend(year);
        let bond_end = bond_interest(bond, history.bond_yield(year));

        withdrawal += withdrawal * history.inflation(year);
        balance = equity_end + bond_end - withdrawal;

        equity = pct_equity * balance;
        bond = (1.0 - pct_equity) * balance;
    }

    Ok(balance)
}

/// Fraction of start offsets whose freshly sampled path ends above zero.
///
/// Every offset draws its own path from `rng`; offsets never share one.
pub fn success_probability<R: Rng + ?Sized>(
    history: &HistoricalSeries,
    sampler: &ReturnSampler,
    num_years: usize,
    withdrawal_rate: f64,
    pct_equity: f64,
    rng: &mut R,
) -> Result<f64> {
    let path_len = sampler.path_len();
    if num_years == 0 || num_years >= path_len {
        return Err(SimError::invalid_parameter(format!(
            "retirement length must be between 1 and {} years, got {num_years}",
            path_len - 1
        )));
    }

    let trials = path_len - num_years;
    let mut successes = 0_usize;
    for start_year in 0..trials {
        let path = sampler.sample(rng);
        let window =
            RetirementWindow::new(num_years, start_year, withdrawal_rate).with_equity(pct_equity);
        if simulate_portfolio(history, &path, &window)? > 0.0 {
            successes += 1;
        }
    }

    log::debug!(
        "{num_years}-year window at {withdrawal_rate}: {successes}/{trials} offsets survived"
    );
    Ok(successes as f64 / trials as f64)
}

pub fn run_distribution(inputs: &Inputs, history: &HistoricalSeries) -> Result<DistributionReport> {
    if inputs.iterations == 0 || inputs.iterations > MAX_ITERATIONS {
        return Err(SimError::invalid_parameter(format!(
            "iterations must be between 1 and {MAX_ITERATIONS}"
        )));
    }
    let sampler = ReturnSampler::new(&inputs.sampler)?;

    let mut scenarios = Vec::with_capacity(inputs.scenarios.len());
    for (scenario_id, scenario) in inputs.scenarios.iter().enumerate() {
        scenarios.push(evaluate_scenario(
            inputs,
            history,
            &sampler,
            scenario_id as u32,
            scenario,
        )?);
    }

    log::info!(
        "distribution complete: {} scenarios x {} iterations (seed {})",
        scenarios.len(),
        inputs.iterations,
        inputs.seed
    );

    Ok(DistributionReport {
        seed: inputs.seed,
        iterations: inputs.iterations,
        pct_equity: inputs.pct_equity,
        scenarios,
    })
}

fn evaluate_scenario(
    inputs: &Inputs,
    history: &HistoricalSeries,
    sampler: &ReturnSampler,
    scenario_id: u32,
    scenario: &Scenario,
) -> Result<ScenarioDistribution> {
    let mut success_rates = Vec::with_capacity(inputs.iterations as usize);
    for iteration in 0..inputs.iterations {
        let mut rng = StdRng::seed_from_u64(derive_seed(inputs.seed, scenario_id, iteration));
        success_rates.push(success_probability(
            history,
            sampler,
            scenario.years,
            scenario.withdrawal_rate,
            inputs.pct_equity,
            &mut rng,
        )?);
    }

    let mean = mean(&success_rates);
    let mut sorted = success_rates.clone();
    Ok(ScenarioDistribution {
        years: scenario.years,
        withdrawal_rate: scenario.withdrawal_rate,
        trials_per_iteration: sampler.path_len().saturating_sub(scenario.years),
        mean,
        rounded_mean: (mean * 100.0).round_ties_even() / 100.0,
        std_dev: std_dev(&success_rates, mean),
        min: sorted.iter().copied().fold(f64::INFINITY, f64::min),
        max: sorted.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        p10: percentile(&mut sorted, 10.0),
        median: percentile(&mut sorted, 50.0),
        p90: percentile(&mut sorted, 90.0),
        success_rates,
    })
}

/// Return-frequency bins over the historical equity returns, falling back to
/// one sampled path when the history carries none. The flag reports which.
pub fn return_frequency<R: Rng + ?Sized>(
    history: &HistoricalSeries,
    sampler: &ReturnSampler,
    bins: usize,
    rng: &mut R,
) -> (Vec<HistogramBin>, bool) {
    let historical = history.equity_returns();
    if historical.is_empty() {
        let path = sampler.sample(rng);
        (histogram(&path.returns, bins), false)
    } else {
        (histogram(&historical, bins), true)
    }
}

pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi <= lo {
        return vec![HistogramBin {
            lower: lo,
            upper: hi,
            count: values.len(),
        }];
    }

    let width = (hi - lo) / bins as f64;
    let mut out = (0..bins)
        .map(|idx| HistogramBin {
            lower: lo + width * idx as f64,
            upper: if idx + 1 == bins {
                hi
            } else {
                lo + width * (idx + 1) as f64
            },
            count: 0,
        })
        .collect::<Vec<_>>();

    for value in values {
        let idx = (((value - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

fn validate_window(window: &RetirementWindow) -> Result<()> {
    if window.num_years == 0 {
        return Err(SimError::invalid_parameter(
            "retirement length must be at least 1 year",
        ));
    }
    if !window.withdrawal_rate.is_finite() || window.withdrawal_rate < 0.0 {
        return Err(SimError::invalid_parameter(
            "withdrawal rate must be finite and >= 0",
        ));
    }
    if !(0.0..=1.0).contains(&window.pct_equity) {
        return Err(SimError::invalid_parameter(
            "equity allocation must be between 0 and 1",
        ));
    }
    Ok(())
}

pub fn derive_seed(base_seed: u64, scenario_id: u32, iteration: u32) -> u64 {
    let mixed = base_seed ^ ((scenario_id as u64) << 32) ^ iteration as u64;
    splitmix64(mixed)
}

fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

fn percentile(values: &mut [f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    values.sort_by(|a, b| a.total_cmp(b));

    let n = values.len();
    if n == 1 {
        return values[0];
    }

    let rank = (p / 100.0) * (n as f64 - 1.0);
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        values[lower]
    } else {
        let w = rank - lower as f64;
        values[lower] * (1.0 - w) + values[upper] * w
    }
}
