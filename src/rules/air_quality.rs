/// Conditions against the air-quality block (fine dust / AQI).
use super::{compare, number, text, Condition, ConditionEvaluator, DataSource};
use crate::context::{AirQualityData, Context};
use serde_json::Value;

#[derive(Debug, Default, Clone, Copy)]
pub struct AirQualityEvaluator;

fn resolve(aq: &AirQualityData, field: &str) -> Option<Value> {
    match field {
        "pm10"     => number(aq.pm10),
        "pm25"     => number(aq.pm25),
        "aqi"      => number(aq.aqi),
        "status"   => text(aq.status.as_ref()),
        "location" => text(aq.location.as_ref()),
        _ => None,
    }
}

impl ConditionEvaluator for AirQualityEvaluator {
    fn can_evaluate(&self, source: DataSource) -> bool {
        source == DataSource::AirQuality
    }

    fn evaluate(&self, ctx: &Context, condition: &Condition) -> bool {
        let Some(aq) = ctx.air_quality.as_ref() else {
            return false;
        };
        let actual = resolve(aq, &condition.field);
        compare(actual.as_ref(), condition.operator, &condition.value)
    }
}
