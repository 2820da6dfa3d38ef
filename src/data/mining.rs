use serde::{Deserialize, Serialize};

/// Operating mode of the miner, as exposed by its mode selector.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum MiningMode {
    Normal,
    /// High performance mode, runs above factory power
    High,
    /// Low power mode
    Low,
}

/// A named tuning preset the device is currently applying, if it exposes
/// preset-based tuning at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningPreset {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningModeConfig {
    pub mode: MiningMode,
    pub active_preset: Option<MiningPreset>,
}

/// The device's mining configuration as last read back from it.
///
/// Only the mode section is modeled; everything else the device reports
/// (pools, fan curves, vendor extensions) rides along untouched in `extra`
/// so the published snapshot does not lose it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MiningConfig {
    pub mining_mode: Option<MiningModeConfig>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MiningConfig {
    /// The active preset name, when the whole mode/preset chain is present.
    pub fn active_preset_name(&self) -> Option<String> {
        self.mining_mode
            .as_ref()?
            .active_preset
            .as_ref()
            .map(|preset| preset.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn preset_name_requires_full_chain() {
        let mut config = MiningConfig::default();
        assert_eq!(config.active_preset_name(), None);

        config.mining_mode = Some(MiningModeConfig {
            mode: MiningMode::Normal,
            active_preset: None,
        });
        assert_eq!(config.active_preset_name(), None);

        config.mining_mode = Some(MiningModeConfig {
            mode: MiningMode::Normal,
            active_preset: Some(MiningPreset {
                name: "factory".to_string(),
            }),
        });
        assert_eq!(config.active_preset_name(), Some("factory".to_string()));
    }

    #[test]
    fn mode_parses_selector_labels() {
        assert_eq!(MiningMode::from_str("High"), Ok(MiningMode::High));
        assert_eq!(MiningMode::from_str("low"), Ok(MiningMode::Low));
        assert_eq!(MiningMode::High.to_string(), "High");
    }

    #[test]
    fn unmodeled_config_fields_survive_a_round_trip() {
        let raw = serde_json::json!({
            "mining_mode": { "mode": "normal", "active_preset": null },
            "pools": [{ "url": "stratum+tcp://pool.example:3333" }],
        });
        let config: MiningConfig = serde_json::from_value(raw.clone()).unwrap();
        assert!(config.extra.contains_key("pools"));
        assert_eq!(serde_json::to_value(&config).unwrap(), raw);
    }
}
