use serde::Serialize;

pub const PATH_LEN: usize = 142;
/// Real S&P share price in 1871, the first year of the simulated series.
pub const SEED_PRICE: f64 = 82.03;
pub const INITIAL_BALANCE: f64 = 100_000.0;
pub const DEFAULT_PCT_EQUITY: f64 = 0.5;
pub const DEFAULT_ITERATIONS: u32 = 100;
pub const MAX_ITERATIONS: u32 = 10_000;

/// Triangular return regime, parameterised as `(low, high, mode)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Regime {
    pub low: f64,
    pub high: f64,
    pub mode: f64,
}

impl Regime {
    pub const DOWNSIDE: Regime = Regime {
        low: -0.5,
        high: 0.075,
        mode: 0.025,
    };
    pub const UPSIDE: Regime = Regime {
        low: 0.075,
        high: 0.5,
        mode: 0.125,
    };
}

#[derive(Debug, Clone)]
pub struct SamplerConfig {
    pub path_len: usize,
    pub seed_price: f64,
    pub downside: Regime,
    pub upside: Regime,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            path_len: PATH_LEN,
            seed_price: SEED_PRICE,
            downside: Regime::DOWNSIDE,
            upside: Regime::UPSIDE,
        }
    }
}

/// Co-indexed synthetic returns and the share prices they imply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketPath {
    pub returns: Vec<f64>,
    pub prices: Vec<f64>,
}

impl MarketPath {
    pub fn from_returns(seed_price: f64, returns: Vec<f64>) -> Self {
        let mut prices = Vec::with_capacity(returns.len());
        if !returns.is_empty() {
            prices.push(seed_price);
        }
        for i in 1..returns.len() {
            prices.push(prices[i - 1] * (1.0 + returns[i - 1]));
        }
        Self { returns, prices }
    }

    pub fn len(&self) -> usize {
        self.returns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.returns.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RetirementWindow {
    pub num_years: usize,
    pub start_year: usize,
    pub withdrawal_rate: f64,
    pub pct_equity: f64,
}

impl RetirementWindow {
    pub fn new(num_years: usize, start_year: usize, withdrawal_rate: f64) -> Self {
        Self {
            num_years,
            start_year,
            withdrawal_rate,
            pct_equity: DEFAULT_PCT_EQUITY,
        }
    }

    pub fn with_equity(mut self, pct_equity: f64) -> Self {
        self.pct_equity = pct_equity;
        self
    }

    /// Number of historical/path entries the window reads.
    pub fn years_required(&self) -> usize {
        (self.start_year + self.num_years).saturating_sub(1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub years: usize,
    pub withdrawal_rate: f64,
}

impl Scenario {
    pub fn defaults() -> Vec<Scenario> {
        vec![
            Scenario {
                years: 30,
                withdrawal_rate: 0.04,
            },
            Scenario {
                years: 60,
                withdrawal_rate: 0.04,
            },
            Scenario {
                years: 30,
                withdrawal_rate: 0.03,
            },
            Scenario {
                years: 60,
                withdrawal_rate: 0.03,
            },
        ]
    }
}

#[derive(Debug, Clone)]
pub struct Inputs {
    pub scenarios: Vec<Scenario>,
    pub iterations: u32,
    pub pct_equity: f64,
    pub seed: u64,
    pub sampler: SamplerConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDistribution {
    pub years: usize,
    pub withdrawal_rate: f64,
    pub trials_per_iteration: usize,
    pub success_rates: Vec<f64>,
    pub mean: f64,
    pub rounded_mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p10: f64,
    pub median: f64,
    pub p90: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionReport {
    pub seed: u64,
    pub iterations: u32,
    pub pct_equity: f64,
    pub scenarios: Vec<ScenarioDistribution>,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}
