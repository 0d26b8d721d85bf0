use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use itertools::Itertools;
use serde::Deserialize;

use crate::error::Error;
use crate::models::Program;
use crate::schedule::RawSchedule;

pub fn load<P: AsRef<Path>>(config_path: P) -> Arc<Config> {
    let config_path = config_path.as_ref();
    let reader = File::open(config_path).unwrap_or_else(|err| {
        panic!("Failed to open {}: {}", config_path.display(), err);
    });
    let config: Config = serde_yaml::from_reader(reader).unwrap_or_else(|err| {
        panic!("Failed to parse {}: {}", config_path.display(), err);
    });

    config.validate();

    Arc::new(config)
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub channels: Vec<ChannelConfig>,
}

impl Config {
    fn validate(&self) {
        self.generator.validate();
        self.channels
            .iter()
            .enumerate()
            .for_each(|(i, config)| config.validate(i));
        assert_eq!(
            self.channels.len(),
            self.channels
                .iter()
                .map(|config| config.number)
                .unique()
                .count(),
            "config.channels: `number` must be a unique"
        );
    }

    pub fn find_channel(&self, number: u32) -> Result<&ChannelConfig, Error> {
        self.channels
            .iter()
            .find(|config| config.number == number)
            .ok_or(Error::ChannelNotFound)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Cancels a generation running longer than this.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    fn validate(&self) {
        if let Some(timeout) = self.timeout {
            assert!(
                !timeout.is_zero(),
                "config.generator: `timeout` must be larger than 0"
            );
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    pub number: u32,
    pub name: String,
    /// Path to a JSON file containing an array of programs.
    pub programs: String,
    /// Path to a JSON file containing a time-slot schedule.
    pub schedule: String,
}

impl ChannelConfig {
    fn validate(&self, index: usize) {
        assert!(
            !self.name.is_empty(),
            "config.channels[{index}]: `name` must be a non-empty string"
        );
        assert!(
            Path::new(&self.programs).is_file(),
            "config.channels[{index}]: `programs` must be a path to an existing file"
        );
        assert!(
            Path::new(&self.schedule).is_file(),
            "config.channels[{index}]: `schedule` must be a path to an existing file"
        );
    }

    pub fn load_programs(&self) -> Result<Vec<Program>, Error> {
        let reader = File::open(&self.programs)
            .with_context(|| format!("Failed to open {}", self.programs))?;
        Ok(serde_json::from_reader(std::io::BufReader::new(reader))?)
    }

    pub fn load_schedule(&self) -> Result<RawSchedule, Error> {
        let reader = File::open(&self.schedule)
            .with_context(|| format!("Failed to open {}", self.schedule))?;
        Ok(serde_json::from_reader(std::io::BufReader::new(reader))?)
    }
}
