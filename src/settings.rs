extern crate anyhow;
extern crate serde;
extern crate serde_json;

use anyhow::Context;
use crate::fetcher;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub title: String,
    pub agency: String,
    pub stop_id: String,
    pub base_url: String,
    pub refresh_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Settings {
        return Settings{
            title: "NextBus".to_string(),
            // 504 King, eastbound at Spadina
            agency: "ttc".to_string(),
            stop_id: "14646".to_string(),
            base_url: fetcher::DEFAULT_BASE_URL.to_string(),
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        };
    }
}

impl Settings {
    pub fn refresh_interval(&self) -> std::time::Duration {
        return std::time::Duration::from_secs(self.refresh_interval_secs);
    }

    fn sanitized(mut self) -> Settings {
        if self.refresh_interval_secs == 0 {
            warn!("refresh_interval_secs must be positive, using {}", DEFAULT_REFRESH_INTERVAL_SECS);
            self.refresh_interval_secs = DEFAULT_REFRESH_INTERVAL_SECS;
        }
        return self;
    }
}

pub fn settings_from_str(raw_json: &str) -> anyhow::Result<Settings> {
    let settings: Settings = serde_json::from_str(raw_json)
        .with_context(|| format!("while parsing settings"))?;
    return Ok(settings.sanitized());
}

pub fn settings_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Settings> {
    let debug_path = path.as_ref().to_str().map(|x| x.to_string());
    let raw_json = std::fs::read_to_string(path)
        .with_context(|| format!("Opening settings from '{:?}'", debug_path))?;
    return settings_from_str(&raw_json);
}

/// Values given on the command line. Each one that is set replaces the
/// corresponding field of the loaded settings.
#[derive(Debug, Default)]
pub struct Overrides {
    pub title: Option<String>,
    pub agency: Option<String>,
    pub stop_id: Option<String>,
}

impl Overrides {
    pub fn apply(self, mut settings: Settings) -> Settings {
        if let Some(title) = self.title {
            settings.title = title;
        }
        if let Some(agency) = self.agency {
            settings.agency = agency;
        }
        if let Some(stop_id) = self.stop_id {
            settings.stop_id = stop_id;
        }
        return settings;
    }
}
