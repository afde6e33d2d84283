//! Year-indexed historical adjustment data: dividends, bond yields, inflation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::error::{Result, SimError};

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct YearRecord {
    pub year: i32,
    /// Real dividend per share, in currency units.
    pub dividend: f64,
    /// Long government bond yield in percent.
    pub bond_yield: f64,
    /// Annual inflation as a fraction.
    pub inflation: f64,
    #[serde(default)]
    pub equity_return: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct HistoricalSeries {
    records: Vec<YearRecord>,
}

impl HistoricalSeries {
    pub fn new(records: Vec<YearRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(SimError::invalid_history("series has no rows"));
        }

        for (idx, record) in records.iter().enumerate() {
            let finite = record.dividend.is_finite()
                && record.bond_yield.is_finite()
                && record.inflation.is_finite()
                && record.equity_return.is_none_or(f64::is_finite);
            if !finite {
                return Err(SimError::invalid_history(format!(
                    "non-finite value in year {}",
                    record.year
                )));
            }
            if idx > 0 && record.year <= records[idx - 1].year {
                return Err(SimError::invalid_history(format!(
                    "years must be strictly increasing ({} follows {})",
                    record.year,
                    records[idx - 1].year
                )));
            }
        }

        Ok(Self { records })
    }

    /// Constant series starting at 1871.
    pub fn flat(len: usize, dividend: f64, bond_yield: f64, inflation: f64) -> Result<Self> {
        let records = (0..len)
            .map(|offset| YearRecord {
                year: 1871 + offset as i32,
                dividend,
                bond_yield,
                inflation,
                equity_return: None,
            })
            .collect();
        Self::new(records)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let records = csv_reader
            .deserialize::<YearRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Self::new(records)
    }

    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let series = Self::from_reader(File::open(path)?)?;
        log::info!(
            "loaded {} years of history from {} ({}..={})",
            series.len(),
            path.display(),
            series.records[0].year,
            series.records[series.len() - 1].year
        );
        Ok(series)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[YearRecord] {
        &self.records
    }

    pub fn dividend(&self, offset: usize) -> f64 {
        self.records[offset].dividend
    }

    pub fn bond_yield(&self, offset: usize) -> f64 {
        self.records[offset].bond_yield
    }

    pub fn inflation(&self, offset: usize) -> f64 {
        self.records[offset].inflation
    }

    pub fn equity_returns(&self) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.equity_return).collect()
    }

    pub fn ensure_covers(&self, years_required: usize) -> Result<()> {
        if self.len() < years_required {
            return Err(SimError::InsufficientHistory {
                required: years_required,
                available: self.len(),
            });
        }
        Ok(())
    }
}

/// Bond portion after one year of interest at `bond_yield_pct` percent.
pub fn bond_interest(balance: f64, bond_yield_pct: f64) -> f64 {
    balance * (1.0 + bond_yield_pct / 100.0)
}
