pub mod air_quality;
pub mod compare;
pub mod transit;
pub mod weather;

pub use air_quality::AirQualityEvaluator;
pub use compare::compare;
pub use transit::TransitEvaluator;
pub use weather::WeatherEvaluator;

use crate::context::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Rule model (configuration data, immutable during an evaluation pass)
// ---------------------------------------------------------------------------

/// Where a condition reads its signal from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    Weather,
    AirQuality,
    BusArrival,
    SubwayArrival,
    /// Anything the rule author typed that we do not know. No evaluator claims it.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    In,
    Between,
    /// Always evaluates to false.
    #[serde(other)]
    Unknown,
}

/// How a condition combines with the *next* condition in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCategory {
    Weather,
    AirQuality,
    Transit,
    TransitComparison,
    #[serde(other)]
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub data_source: DataSource,
    /// Field key, interpreted per data source (e.g. "temperature", "arrivalTime").
    pub field:       String,
    pub operator:    Operator,
    /// Primitive or array depending on the operator. Missing = `null`.
    #[serde(default)]
    pub value:       Value,
    /// Combines this condition's verdict with the following one. Unset = AND.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_operator: Option<LogicalOperator>,
}

impl Condition {
    pub fn new(data_source: DataSource, field: &str, operator: Operator, value: Value) -> Self {
        Self {
            data_source,
            field: field.to_owned(),
            operator,
            value,
            logical_operator: None,
        }
    }

    /// Builder-style setter for the operator joining this condition to the next.
    pub fn then(mut self, op: LogicalOperator) -> Self {
        self.logical_operator = Some(op);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id:       String,
    pub name:     String,
    pub category: RuleCategory,
    /// Higher fires first. Whole numbers only: a fractional priority such
    /// as `12.5` is rejected when the rule set is loaded.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    pub message_template: String,
    #[serde(default = "default_enabled")]
    pub enabled:  bool,
}

fn default_enabled() -> bool { true }

// ---------------------------------------------------------------------------
// Evaluator capability
// ---------------------------------------------------------------------------

/// One signal family's condition evaluator.
///
/// Implementations are stateless; the engine scans its registry in order and
/// hands the condition to the first evaluator whose `can_evaluate` is true.
pub trait ConditionEvaluator: Send + Sync {
    fn can_evaluate(&self, source: DataSource) -> bool;

    /// Resolve `condition.field` against the context and apply the operator.
    /// Any missing data, unknown field, or type mismatch yields false.
    fn evaluate(&self, ctx: &Context, condition: &Condition) -> bool;
}

// ---------------------------------------------------------------------------
// Field value helpers shared by the evaluators
// ---------------------------------------------------------------------------

pub(crate) fn number(v: Option<f64>) -> Option<Value> {
    v.and_then(serde_json::Number::from_f64).map(Value::Number)
}

pub(crate) fn integer(v: Option<i64>) -> Option<Value> {
    v.map(Value::from)
}

pub(crate) fn text(v: Option<&String>) -> Option<Value> {
    v.map(|s| Value::String(s.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rule_json() {
        let raw = json!({
            "id": "r1",
            "name": "cold",
            "category": "WEATHER",
            "priority": 10,
            "conditions": [
                { "dataSource": "WEATHER", "field": "temperature", "operator": "lt", "value": 10, "logicalOperator": "OR" },
                { "dataSource": "WEATHER", "field": "condition", "operator": "in", "value": ["Snow", "Rain"] }
            ],
            "messageTemplate": "날씨: {{weather.temperature}}도"
        });
        let rule: Rule = serde_json::from_value(raw).unwrap();
        assert!(rule.enabled);
        assert_eq!(rule.category, RuleCategory::Weather);
        assert_eq!(rule.conditions[0].logical_operator, Some(LogicalOperator::Or));
        assert_eq!(rule.conditions[1].logical_operator, None);
        assert_eq!(rule.conditions[1].operator, Operator::In);
    }

    #[test]
    fn unknown_enum_values_degrade() {
        let raw = json!({
            "dataSource": "TRAFFIC", "field": "x", "operator": "regex", "value": "a.*"
        });
        let cond: Condition = serde_json::from_value(raw).unwrap();
        assert_eq!(cond.data_source, DataSource::Unknown);
        assert_eq!(cond.operator, Operator::Unknown);

        let cat: RuleCategory = serde_json::from_value(json!("CLOTHING")).unwrap();
        assert_eq!(cat, RuleCategory::General);
    }

    #[test]
    fn priority_must_be_whole() {
        let base = json!({ "id": "p", "name": "p", "category": "WEATHER", "messageTemplate": "" });

        let mut raw = base.clone();
        raw["priority"] = json!(-3);
        assert_eq!(serde_json::from_value::<Rule>(raw).unwrap().priority, -3);

        let mut raw = base;
        raw["priority"] = json!(12.5);
        assert!(serde_json::from_value::<Rule>(raw).is_err());
    }

    #[test]
    fn missing_value_is_null() {
        let cond: Condition = serde_json::from_value(json!({
            "dataSource": "WEATHER", "field": "temperature", "operator": "eq"
        }))
        .unwrap();
        assert!(cond.value.is_null());
    }
}
