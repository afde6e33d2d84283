mod engine;
mod error;
mod history;
mod sampler;
mod types;

pub use engine::{
    derive_seed, histogram, return_frequency, run_distribution, simulate_portfolio,
    success_probability,
};
pub use error::{Result, SimError};
pub use history::{HistoricalSeries, YearRecord, bond_interest};
pub use sampler::ReturnSampler;
pub use types::{
    DEFAULT_ITERATIONS, DEFAULT_PCT_EQUITY, DistributionReport, HistogramBin, INITIAL_BALANCE,
    Inputs, MAX_ITERATIONS, MarketPath, PATH_LEN, Regime, RetirementWindow, SEED_PRICE,
    SamplerConfig, Scenario, ScenarioDistribution,
};
