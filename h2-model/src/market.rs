use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when the two market series cannot form a valid horizon.
#[derive(Debug, Error, PartialEq)]
pub enum MarketSeriesError {
    #[error("spot price series has {prices} entries but carbon intensity has {intensities}")]
    LengthMismatch { prices: usize, intensities: usize },
    #[error("market series must contain at least one timestep")]
    Empty,
}

/// Aligned per-timestep market data for one optimization horizon.
///
/// Both series are indexed 0..T-1 and share the horizon length T with every
/// per-timestep variable of the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSeries {
    /// Spot electricity price (currency/MWh)
    pub spot_price_per_mwh: Vec<f64>,
    /// Grid carbon intensity (kg CO2/MWh)
    pub co2_intensity_kg_per_mwh: Vec<f64>,
}

impl MarketSeries {
    /// Build a series pair, rejecting misaligned or empty inputs.
    pub fn new(
        spot_price_per_mwh: Vec<f64>,
        co2_intensity_kg_per_mwh: Vec<f64>,
    ) -> Result<Self, MarketSeriesError> {
        if spot_price_per_mwh.len() != co2_intensity_kg_per_mwh.len() {
            return Err(MarketSeriesError::LengthMismatch {
                prices: spot_price_per_mwh.len(),
                intensities: co2_intensity_kg_per_mwh.len(),
            });
        }
        if spot_price_per_mwh.is_empty() {
            return Err(MarketSeriesError::Empty);
        }
        Ok(Self {
            spot_price_per_mwh,
            co2_intensity_kg_per_mwh,
        })
    }

    /// Constant-price, constant-intensity series of the given length
    pub fn flat(price: f64, intensity: f64, steps: usize) -> Result<Self, MarketSeriesError> {
        Self::new(vec![price; steps], vec![intensity; steps])
    }

    /// Horizon length T
    pub fn len(&self) -> usize {
        self.spot_price_per_mwh.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spot_price_per_mwh.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_length_mismatch() {
        let err = MarketSeries::new(vec![50.0; 24], vec![100.0; 23]).unwrap_err();
        assert_eq!(
            err,
            MarketSeriesError::LengthMismatch {
                prices: 24,
                intensities: 23
            }
        );
    }

    #[test]
    fn test_rejects_empty_series() {
        assert_eq!(
            MarketSeries::new(vec![], vec![]).unwrap_err(),
            MarketSeriesError::Empty
        );
    }

    #[test]
    fn test_flat_series() {
        let series = MarketSeries::flat(50.0, 120.0, 24).unwrap();
        assert_eq!(series.len(), 24);
        assert!(series.spot_price_per_mwh.iter().all(|&p| p == 50.0));
        assert!(series.co2_intensity_kg_per_mwh.iter().all(|&i| i == 120.0));
    }
}
