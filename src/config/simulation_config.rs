use crate::data::HistoryPeriod;
use crate::engine::SimulationConfig;
use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//named simulation sizes offered by the menu
//low runs the most trials, high the fewest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimCountPreset {
    Low,
    Medium,
    High,
}

impl SimCountPreset {
    //parse preset from string
    pub fn parse(s: &str) -> Result<Self, SimulationError> {
        match s.to_lowercase().as_str() {
            "low" => Ok(SimCountPreset::Low),
            "medium" | "med" => Ok(SimCountPreset::Medium),
            "high" => Ok(SimCountPreset::High),
            _ => Err(SimulationError::InvalidPreset(s.to_string())),
        }
    }

    pub fn sim_count(&self) -> usize {
        match self {
            SimCountPreset::Low => 50_000,
            SimCountPreset::Medium => 10_000,
            SimCountPreset::High => 5_000,
        }
    }
}

//complete simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfiguration {
    //data
    pub data_path: PathBuf,
    pub ticker: String,
    pub period: HistoryPeriod,

    //simulation
    pub sim_count: usize,
    pub day_count: usize,
    pub seed: Option<u64>,
    pub workers: Option<usize>,

    //logging
    pub log_level: String,

    //optional output paths
    pub output_terminal_csv: Option<PathBuf>,
    pub output_paths_csv: Option<PathBuf>,
}

impl Default for SimulationConfiguration {
    fn default() -> Self {
        SimulationConfiguration {
            data_path: PathBuf::from("data.csv"),
            ticker: "AAPL".to_string(),
            period: HistoryPeriod::Max,
            sim_count: SimCountPreset::High.sim_count(),
            day_count: 25,
            seed: None,
            workers: None,
            log_level: "warn".to_string(),
            output_terminal_csv: None,
            output_paths_csv: None,
        }
    }
}

impl SimulationConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: SimulationConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    //engine settings for this run
    pub fn engine_config(&self) -> SimulationConfig {
        SimulationConfig {
            sim_count: self.sim_count,
            day_count: self.day_count,
            workers: self.workers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_presets() {
        assert_eq!(SimCountPreset::parse("LOW").unwrap().sim_count(), 50_000);
        assert_eq!(SimCountPreset::parse("medium").unwrap().sim_count(), 10_000);
        assert_eq!(SimCountPreset::parse("High").unwrap().sim_count(), 5_000);
        assert!(SimCountPreset::parse("huge").is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sim.json");

        let config = SimulationConfiguration {
            ticker: "MSFT".to_string(),
            period: HistoryPeriod::Years(5),
            sim_count: 1234,
            seed: Some(99),
            ..Default::default()
        };
        config.to_json_file(&path).unwrap();

        let loaded = SimulationConfiguration::from_json_file(&path).unwrap();
        assert_eq!(loaded.ticker, "MSFT");
        assert_eq!(loaded.period, HistoryPeriod::Years(5));
        assert_eq!(loaded.sim_count, 1234);
        assert_eq!(loaded.seed, Some(99));
        assert_eq!(loaded.day_count, 25);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"ticker": "TSLA", "day_count": 10}"#).unwrap();

        let loaded = SimulationConfiguration::from_json_file(&path).unwrap();
        assert_eq!(loaded.ticker, "TSLA");
        assert_eq!(loaded.day_count, 10);
        assert_eq!(loaded.sim_count, 5_000);
        assert_eq!(loaded.period, HistoryPeriod::Max);

        let engine = loaded.engine_config();
        assert_eq!(engine.day_count, 10);
    }
}
