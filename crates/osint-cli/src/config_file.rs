//! Optional TOML config-file overlay for [`ScanConfig`], loaded before CLI
//! flags are applied. Every field is optional — an absent key just leaves
//! the built-in default in place.

use std::path::Path;
use std::time::Duration;

use osint_orchestrator::ScanConfig;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    scan_deadline_seconds: Option<u64>,
    probe_deadline_seconds: Option<u64>,
    hop_1_fan_out: Option<usize>,
    hop_2_username_cap: Option<usize>,
    hop_2_username_fan_out: Option<usize>,
    drain_grace_period_seconds: Option<u64>,
    inter_probe_pause_millis: Option<u64>,
}

/// Read a TOML config file and layer it over [`ScanConfig::default`].
pub fn load(path: &Path) -> anyhow::Result<ScanConfig> {
    let text = std::fs::read_to_string(path)?;
    let file: FileConfig = toml::from_str(&text)?;
    let mut config = ScanConfig::default();

    if let Some(secs) = file.scan_deadline_seconds {
        config.scan_deadline = Duration::from_secs(secs);
    }
    if let Some(secs) = file.probe_deadline_seconds {
        config.probe_deadline = Duration::from_secs(secs);
    }
    if let Some(n) = file.hop_1_fan_out {
        config.hop_1_fan_out = n;
    }
    if let Some(n) = file.hop_2_username_cap {
        config.hop_2_username_cap = n;
    }
    if let Some(n) = file.hop_2_username_fan_out {
        config.hop_2_username_fan_out = n;
    }
    if let Some(secs) = file.drain_grace_period_seconds {
        config.drain_grace_period = Duration::from_secs(secs);
    }
    if let Some(millis) = file.inter_probe_pause_millis {
        config.inter_probe_pause = Duration::from_millis(millis);
    }

    Ok(config)
}
