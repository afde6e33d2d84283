//! Synthetic equity return paths.
//!
//! Each year's return comes from one of two triangular regimes picked with a
//! fair coin. Returns are rounded to four decimals before the price path is
//! compounded from them.

use rand::Rng;
use rand_distr::{Distribution, Triangular};

use super::error::{Result, SimError};
use super::types::{MarketPath, Regime, SamplerConfig};

#[derive(Debug, Clone)]
pub struct ReturnSampler {
    path_len: usize,
    seed_price: f64,
    downside: Triangular<f64>,
    upside: Triangular<f64>,
}

impl ReturnSampler {
    pub fn new(config: &SamplerConfig) -> Result<Self> {
        if config.path_len == 0 {
            return Err(SimError::invalid_parameter("path length must be > 0"));
        }
        if !config.seed_price.is_finite() || config.seed_price <= 0.0 {
            return Err(SimError::invalid_parameter(
                "seed price must be finite and > 0",
            ));
        }

        Ok(Self {
            path_len: config.path_len,
            seed_price: config.seed_price,
            downside: triangular(&config.downside, "downside")?,
            upside: triangular(&config.upside, "upside")?,
        })
    }

    pub fn path_len(&self) -> usize {
        self.path_len
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MarketPath {
        let returns = (0..self.path_len)
            .map(|_| {
                let raw = if rng.gen_bool(0.5) {
                    self.downside.sample(rng)
                } else {
                    self.upside.sample(rng)
                };
                round_to_4(raw)
            })
            .collect::<Vec<_>>();

        MarketPath::from_returns(self.seed_price, returns)
    }
}

fn triangular(regime: &Regime, label: &str) -> Result<Triangular<f64>> {
    let finite = regime.low.is_finite() && regime.high.is_finite() && regime.mode.is_finite();
    if !finite || !(regime.low <= regime.mode && regime.mode <= regime.high) {
        return Err(SimError::invalid_parameter(format!(
            "{label} regime must satisfy low <= mode <= high (got low {}, high {}, mode {})",
            regime.low, regime.high, regime.mode
        )));
    }

    Triangular::new(regime.low, regime.high, regime.mode)
        .map_err(|e| SimError::invalid_parameter(format!("{label} regime: {e}")))
}

fn round_to_4(value: f64) -> f64 {
    (value * 10_000.0).round_ties_even() / 10_000.0
}
