/// Application configuration, persisted as TOML in the config directory.
///
///   <config_dir>/config.toml
///
/// Also owns rule-file loading: the rule-storage side of the engine. A rule
/// file is the same `[[rules]]` layout the embedded presets use, minus the
/// `[preset]` header.
use crate::{
    error::RuleSetError,
    presets,
    rules::{DataSource, Operator, Rule},
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-maintained rule file, evaluated after the presets.
    #[serde(default)]
    pub rules_path: Option<PathBuf>,

    /// Include the embedded preset rules.
    #[serde(default = "default_include_presets")]
    pub include_presets: bool,

    /// `EnvFilter` directive string, e.g. "commute_alert_lib=debug".
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Daily rolling log files go here when set; stderr otherwise.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_include_presets() -> bool { true }

fn default_log_filter() -> String { "commute_alert_lib=info".to_owned() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rules_path:      None,
            include_presets: default_include_presets(),
            log_filter:      default_log_filter(),
            log_dir:         None,
        }
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

pub fn load_or_default(config_dir: &Path) -> Result<AppConfig> {
    let path = config_dir.join("config.toml");
    if path.exists() {
        let raw = std::fs::read_to_string(&path)?;
        let cfg: AppConfig = toml::from_str(&raw)
            .map_err(|e| anyhow::anyhow!("Config parse error: {}", e))?;
        Ok(cfg)
    } else {
        Ok(AppConfig::default())
    }
}

pub fn save(config: &AppConfig, config_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(config_dir)?;
    let raw = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("Config serialize error: {}", e))?;
    std::fs::write(config_dir.join("config.toml"), raw)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Rule files
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<Rule>,
}

/// Parse a `[[rules]]` TOML file. Lint findings are logged, not fatal;
/// duplicate ids are rejected because dispatch keys on them.
pub fn load_rule_file(path: &Path) -> std::result::Result<Vec<Rule>, RuleSetError> {
    let raw = std::fs::read_to_string(path).map_err(|source| RuleSetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: RuleFile = toml::from_str(&raw).map_err(|source| RuleSetError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    ensure_unique_ids(&file.rules)?;
    for rule in &file.rules {
        for finding in lint_rule(rule) {
            tracing::warn!("{}: rule '{}': {}", path.display(), rule.id, finding);
        }
    }
    tracing::info!("Loaded {} rules from {}", file.rules.len(), path.display());
    Ok(file.rules)
}

/// Presets (if enabled) followed by the configured rule file (if any).
pub fn resolve_rules(config: &AppConfig) -> std::result::Result<Vec<Rule>, RuleSetError> {
    let mut rules = if config.include_presets { presets::all_rules() } else { Vec::new() };
    if let Some(path) = &config.rules_path {
        rules.extend(load_rule_file(path)?);
    }
    ensure_unique_ids(&rules)?;
    Ok(rules)
}

fn ensure_unique_ids(rules: &[Rule]) -> std::result::Result<(), RuleSetError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(rule.id.as_str()) {
            return Err(RuleSetError::DuplicateId(rule.id.clone()));
        }
    }
    Ok(())
}

/// Things in a rule that will quietly never match. The engine tolerates all
/// of them; this exists so authors hear about it at load time.
pub fn lint_rule(rule: &Rule) -> Vec<String> {
    let mut findings = Vec::new();

    if rule.conditions.is_empty() {
        findings.push("no conditions, rule can never match".to_owned());
    }

    for (i, cond) in rule.conditions.iter().enumerate() {
        let at = format!("condition {} ({})", i, cond.field);

        if cond.data_source == DataSource::Unknown {
            findings.push(format!("{}: unknown data source", at));
        }

        match cond.operator {
            Operator::Unknown => findings.push(format!("{}: unknown operator", at)),
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte if !cond.value.is_number() => {
                findings.push(format!("{}: {:?} needs a numeric value", at, cond.operator));
            }
            Operator::Contains if !cond.value.is_string() => {
                findings.push(format!("{}: contains needs a string value", at));
            }
            Operator::In if !cond.value.is_array() => {
                findings.push(format!("{}: in needs an array value", at));
            }
            Operator::Between if !is_numeric_pair(&cond.value) => {
                findings.push(format!("{}: between needs [min, max]", at));
            }
            _ => {}
        }

        if i + 1 == rule.conditions.len() && cond.logical_operator.is_some() {
            findings.push(format!("{}: logicalOperator on the last condition is ignored", at));
        }
    }

    findings
}

fn is_numeric_pair(v: &Value) -> bool {
    matches!(v.as_array().map(Vec::as_slice), Some([a, b]) if a.is_number() && b.is_number())
}
