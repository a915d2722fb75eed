//! Input loading: market time series from CSV and scenario parameters from
//! TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use h2_model::{MarketSeries, ScenarioParameters};
use log::warn;
use serde::Deserialize;

/// One row of the market data file
#[derive(Debug, Deserialize)]
struct MarketRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Spot_Price")]
    spot_price: f64,
    #[serde(rename = "CO2_Intensity")]
    co2_intensity: f64,
}

/// Read the aligned spot price and carbon intensity series from a CSV file.
///
/// The `Date` column is informational only: rows are taken in file order as
/// consecutive timesteps. An unparseable timestamp is logged and the row is
/// kept, since only the numeric columns feed the model.
pub fn load_market_series(csv_file_path: &Path) -> Result<MarketSeries> {
    let mut reader = csv::Reader::from_path(csv_file_path)
        .with_context(|| format!("failed to open {}", csv_file_path.display()))?;

    let mut prices = Vec::new();
    let mut intensities = Vec::new();
    for (row, result) in reader.deserialize().enumerate() {
        let record: MarketRecord = result
            .with_context(|| format!("bad record in {}", csv_file_path.display()))?;
        if NaiveDateTime::parse_from_str(&record.date, "%Y-%m-%d %H:%M:%S").is_err() {
            warn!(
                "{}: row {} has unparseable timestamp {:?}",
                csv_file_path.display(),
                row + 1,
                record.date
            );
        }
        prices.push(record.spot_price);
        intensities.push(record.co2_intensity);
    }

    MarketSeries::new(prices, intensities)
        .with_context(|| format!("invalid market data in {}", csv_file_path.display()))
}

/// Read scenario parameters from a TOML file and validate them.
///
/// Missing keys fall back to the defaults; unknown keys are rejected so a
/// typo cannot silently leave a default in place.
pub fn load_scenario(toml_file_path: &Path) -> Result<ScenarioParameters> {
    let contents = fs::read_to_string(toml_file_path)
        .with_context(|| format!("failed to read {}", toml_file_path.display()))?;
    let scenario: ScenarioParameters = toml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", toml_file_path.display()))?;
    scenario
        .validate()
        .with_context(|| format!("invalid scenario in {}", toml_file_path.display()))?;
    Ok(scenario)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use h2_model::ElectrolyserTechnology;
    use tempfile::NamedTempFile;

    use super::*;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_market_series() {
        let file = write_temp(
            "Date,Spot_Price,CO2_Intensity\n\
             2023-01-01 00:00:00,42.5,120.0\n\
             2023-01-01 01:00:00,38.0,110.0\n",
        );
        let series = load_market_series(file.path()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.spot_price_per_mwh, vec![42.5, 38.0]);
        assert_eq!(series.co2_intensity_kg_per_mwh, vec![120.0, 110.0]);
    }

    #[test]
    fn test_bad_timestamp_is_tolerated() {
        let file = write_temp(
            "Date,Spot_Price,CO2_Intensity\n\
             not a date,42.5,120.0\n",
        );
        let series = load_market_series(file.path()).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_empty_market_file_is_rejected() {
        let file = write_temp("Date,Spot_Price,CO2_Intensity\n");
        assert!(load_market_series(file.path()).is_err());
    }

    #[test]
    fn test_non_numeric_price_is_rejected() {
        let file = write_temp(
            "Date,Spot_Price,CO2_Intensity\n\
             2023-01-01 00:00:00,cheap,120.0\n",
        );
        assert!(load_market_series(file.path()).is_err());
    }

    #[test]
    fn test_load_scenario_with_partial_keys() {
        let file = write_temp(
            "technology = \"AEL\"\n\
             h2_target_kg = 1000000.0\n\
             resale_allowed = true\n",
        );
        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.technology, ElectrolyserTechnology::Ael);
        assert_eq!(scenario.h2_target_kg, 1_000_000.0);
        assert!(scenario.resale_allowed);
        // Unlisted keys keep their defaults
        assert_eq!(scenario.electrolyser_rated_power_mw, 100.0);
    }

    #[test]
    fn test_unknown_scenario_key_is_rejected() {
        let file = write_temp("h2_target = 1.0\n");
        assert!(load_scenario(file.path()).is_err());
    }

    #[test]
    fn test_invalid_scenario_value_is_rejected() {
        let file = write_temp("charge_efficiency = 1.5\n");
        assert!(load_scenario(file.path()).is_err());
    }

    #[test]
    fn test_non_finite_scenario_value_is_rejected() {
        // TOML floats admit nan and inf literals
        let file = write_temp("h2_target_kg = inf\n");
        assert!(load_scenario(file.path()).is_err());

        let file = write_temp("electrolyser_rated_power_mw = nan\n");
        assert!(load_scenario(file.path()).is_err());
    }
}
