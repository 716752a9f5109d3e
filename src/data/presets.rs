//! Presets: named constrained searches (fixed pieces, weight caps, slot subsets)
//! loaded from YAML, plus the built-in playthrough templates.
//!
//! ```yaml
//! presets:
//!   - name: rl1
//!     description: Gauntlets + legs for a level-1 run
//!     slots: [Gauntlets, Legs]
//!     objective: maximize-score
//!     constraint: { attribute: poise, minimum: 30 }
//!     max_total_cost: 20.6
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::data::item::{Attribute, Slot};
use crate::error::{ConfigError, PresetError};
use crate::optimizer::modes::DEFAULT_POISE_TARGET;
use crate::optimizer::objective::Objective;
use crate::optimizer::SearchConfig;

pub const DEFAULT_PRESETS_PATH: &str = "data/presets.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub config: SearchConfig,
}

#[derive(Debug, Deserialize)]
struct PresetsFile {
    #[serde(default)]
    presets: Vec<PresetEntry>,
}

#[derive(Debug, Deserialize)]
struct ConstraintEntry {
    attribute: String,
    minimum: f64,
}

#[derive(Debug, Deserialize)]
struct PresetEntry {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    slots: Option<Vec<String>>,
    objective: String,
    #[serde(default)]
    constraint: Option<ConstraintEntry>,
    #[serde(default)]
    max_total_cost: Option<f64>,
    #[serde(default)]
    max_item_cost: Option<f64>,
    /// Setting this enables slot skipping.
    #[serde(default)]
    min_occupied: Option<usize>,
    #[serde(default)]
    base_only: bool,
    #[serde(default)]
    fixed: BTreeMap<String, String>,
}

impl PresetEntry {
    fn into_preset(self) -> Result<Preset, ConfigError> {
        let slots = match self.slots {
            Some(names) => names
                .iter()
                .map(|name| name.parse::<Slot>())
                .collect::<Result<Vec<_>, _>>()?,
            None => Slot::ALL.to_vec(),
        };
        let objective: Objective = self.objective.parse()?;
        let (attribute, minimum) = match self.constraint {
            Some(bound) => (bound.attribute.parse::<Attribute>()?, bound.minimum),
            None => (Attribute::Threshold, DEFAULT_POISE_TARGET),
        };

        let mut config =
            SearchConfig::new(slots, objective).with_min_threshold(attribute, minimum);
        config.constraint.max_total_cost = self.max_total_cost;
        config.max_item_cost = self.max_item_cost;
        config.base_content_only = self.base_only;
        if let Some(min) = self.min_occupied {
            config = config.with_skipping(min);
        }
        for (slot, item) in self.fixed {
            config = config.with_fixed(slot.parse()?, item);
        }
        config.validate()?;

        Ok(Preset {
            name: self.name,
            description: self.description,
            config,
        })
    }
}

/// Parse a presets document. Every preset is validated; the first invalid one
/// fails the whole file.
pub fn parse_presets(raw: &str) -> Result<Vec<Preset>, PresetError> {
    let file: PresetsFile = serde_yaml::from_str(raw)?;
    file.presets
        .into_iter()
        .map(|entry| {
            let name = entry.name.clone();
            entry.into_preset()
                .map_err(|source| PresetError::Config { name, source })
        })
        .collect()
}

pub fn load_presets(path: impl AsRef<Path>) -> Result<Vec<Preset>, PresetError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| PresetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_presets(&raw)
}

/// Playthrough templates that ship with the tool.
pub fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset {
            name: "rl1".to_string(),
            description: "level-1 run: best gauntlets + legs, poise >= 30, weight <= 20.6"
                .to_string(),
            config: SearchConfig::new(vec![Slot::Gauntlets, Slot::Legs], Objective::MaximizeScore)
                .with_min_threshold(Attribute::Threshold, 30.0)
                .with_max_total_cost(20.6),
        },
        Preset {
            name: "white-mask".to_string(),
            description: "main playthrough: White Mask fixed, best power/weight, poise >= 51"
                .to_string(),
            config: SearchConfig::full_set(Objective::MaximizeRatio)
                .with_min_threshold(Attribute::Threshold, DEFAULT_POISE_TARGET)
                .with_fixed(Slot::Helm, "White Mask"),
        },
    ]
}

/// Look up `name` among `presets`, falling back to the built-ins.
pub fn find_preset(presets: &[Preset], name: &str) -> Result<Preset, ConfigError> {
    presets
        .iter()
        .find(|preset| preset.name == name)
        .cloned()
        .or_else(|| builtin_presets().into_iter().find(|preset| preset.name == name))
        .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
presets:
  - name: rl1-base
    description: base game only
    slots: [Gauntlets, Legs]
    objective: maximize-score
    constraint: { attribute: poise, minimum: 30 }
    max_total_cost: 20.6
    base_only: true
  - name: light-mask
    objective: minimize-cost
    min_occupied: 2
    fixed:
      helm: Omensmirk Mask
"#;

    #[test]
    fn parses_presets_into_configs() {
        let presets = parse_presets(SAMPLE).unwrap();
        assert_eq!(presets.len(), 2);

        let rl1 = &presets[0].config;
        assert_eq!(rl1.slots, vec![Slot::Gauntlets, Slot::Legs]);
        assert_eq!(rl1.constraint.minimum, 30.0);
        assert_eq!(rl1.constraint.max_total_cost, Some(20.6));
        assert!(rl1.base_content_only);
        assert!(!rl1.allow_skip);

        let light = &presets[1].config;
        assert_eq!(light.slots.len(), 4);
        assert!(light.allow_skip);
        assert_eq!(light.constraint.minimum, DEFAULT_POISE_TARGET);
        assert_eq!(light.fixed.get(&Slot::Helm).map(String::as_str), Some("Omensmirk Mask"));
    }

    #[test]
    fn invalid_preset_names_the_offender() {
        let raw = "presets:\n  - name: bad\n    objective: ratio\n    slots: [Cape]\n";
        match parse_presets(raw) {
            Err(PresetError::Config { name, source }) => {
                assert_eq!(name, "bad");
                assert_eq!(source, ConfigError::UnknownSlot("Cape".to_string()));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_attribute_is_rejected() {
        let raw = "presets:\n  - name: x\n    objective: ratio\n    constraint: { attribute: agility, minimum: 1 }\n";
        assert!(matches!(
            parse_presets(raw),
            Err(PresetError::Config {
                source: ConfigError::UnknownAttribute(_),
                ..
            })
        ));
    }

    #[test]
    fn find_preset_falls_back_to_builtins() {
        let preset = find_preset(&[], "white-mask").unwrap();
        assert_eq!(preset.config.fixed.get(&Slot::Helm).map(String::as_str), Some("White Mask"));
        assert_eq!(
            find_preset(&[], "nope"),
            Err(ConfigError::UnknownPreset("nope".to_string()))
        );
    }
}
