/// Built-in rule presets, embedded at compile time from `data/rules/*.toml`.
///
/// Presets are the rule sets a new alert starts with when the user has not
/// written any custom rules. Embedding the files means the binary works with
/// no rule directory on disk; `AppConfig.rules_path` can still point at a
/// user-maintained file that is loaded alongside or instead of these.
use crate::rules::Rule;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Embedded TOML data
// ---------------------------------------------------------------------------

const WEATHER:     &str = include_str!("../data/rules/weather.toml");
const AIR_QUALITY: &str = include_str!("../data/rules/air_quality.toml");
const TRANSIT:     &str = include_str!("../data/rules/transit.toml");

static ALL_PRESET_DATA: &[&str] = &[WEATHER, AIR_QUALITY, TRANSIT];

static PRESETS: Lazy<Vec<Preset>> = Lazy::new(parse_all);

// ---------------------------------------------------------------------------
// TOML deserialization structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TomlFile {
    preset: TomlPresetMeta,
    #[serde(default)]
    rules:  Vec<Rule>,
}

#[derive(Deserialize)]
struct TomlPresetMeta {
    key:         String,
    name:        String,
    #[serde(default)]
    description: String,
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Preset {
    pub key:         String,
    pub name:        String,
    pub description: String,
    pub rules:       Vec<Rule>,
}

/// Lightweight descriptor for listings (CLI `--list-presets`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub key:         String,
    pub name:        String,
    pub description: String,
    pub rule_count:  usize,
}

fn parse_all() -> Vec<Preset> {
    ALL_PRESET_DATA
        .iter()
        .filter_map(|toml_str| {
            let file: TomlFile = toml::from_str(toml_str)
                .map_err(|e| tracing::warn!("Failed to parse preset TOML: {}", e))
                .ok()?;
            Some(Preset {
                key:         file.preset.key,
                name:        file.preset.name,
                description: file.preset.description,
                rules:       file.rules,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn list_all() -> Vec<PresetInfo> {
    PRESETS
        .iter()
        .map(|p| PresetInfo {
            key:         p.key.clone(),
            name:        p.name.clone(),
            description: p.description.clone(),
            rule_count:  p.rules.len(),
        })
        .collect()
}

/// Case-insensitive lookup by preset key.
pub fn load_preset(key: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.key.eq_ignore_ascii_case(key))
}

/// Every preset rule, in preset order then file order.
pub fn all_rules() -> Vec<Rule> {
    PRESETS.iter().flat_map(|p| p.rules.iter().cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::lint_rule;

    #[test]
    fn lists_three_presets() {
        let presets = list_all();
        assert_eq!(presets.len(), 3);
        let keys: Vec<&str> = presets.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["weather", "air_quality", "transit"]);
        assert!(presets.iter().all(|p| p.rule_count > 0));
    }

    #[test]
    fn loads_by_key_case_insensitive() {
        let p = load_preset("TRANSIT").expect("should load");
        assert!(p.rules.iter().any(|r| r.id == "transit-compare"));
        assert!(load_preset("traffic").is_none());
    }

    #[test]
    fn preset_ids_are_unique() {
        let rules = all_rules();
        let mut ids: Vec<&str> = rules.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn presets_are_lint_clean() {
        for rule in all_rules() {
            assert!(lint_rule(&rule).is_empty(), "{}: {:?}", rule.id, lint_rule(&rule));
        }
    }

    #[test]
    fn cold_bands_have_no_gaps() {
        use crate::context::{Context, WeatherData};
        use chrono::Utc;

        let rules = &load_preset("weather").unwrap().rules;
        let fired = |temp: f64| -> Vec<String> {
            let mut ctx = Context::new("u", "a", Utc::now());
            ctx.weather = Some(WeatherData { temperature: Some(temp), ..Default::default() });
            crate::engine::evaluate(&ctx, rules)
                .into_iter()
                .map(|r| r.rule_id)
                .filter(|id| id == "weather-freezing" || id == "weather-cold")
                .collect()
        };

        assert_eq!(fired(-5.0),  vec!["weather-freezing"]);
        assert_eq!(fired(-4.95), vec!["weather-cold"]);
        assert_eq!(fired(9.95),  vec!["weather-cold"]);
        assert!(fired(10.0).is_empty());
    }

    #[test]
    fn wind_rule_ships_disabled() {
        let p = load_preset("weather").unwrap();
        let wind = p.rules.iter().find(|r| r.id == "weather-wind").unwrap();
        assert!(!wind.enabled);
    }
}
