/// Conditions against the current weather block.
///
/// Fields: temperature, condition, humidity, windSpeed, location.
/// No weather in the context, or a field name we don't know, is false.
use super::{compare, number, text, Condition, ConditionEvaluator, DataSource};
use crate::context::{Context, WeatherData};
use serde_json::Value;

#[derive(Debug, Default, Clone, Copy)]
pub struct WeatherEvaluator;

fn resolve(weather: &WeatherData, field: &str) -> Option<Value> {
    match field {
        "temperature" => number(weather.temperature),
        "condition"   => text(weather.condition.as_ref()),
        "humidity"    => number(weather.humidity),
        "windSpeed"   => number(weather.wind_speed),
        "location"    => text(weather.location.as_ref()),
        _ => None,
    }
}

impl ConditionEvaluator for WeatherEvaluator {
    fn can_evaluate(&self, source: DataSource) -> bool {
        source == DataSource::Weather
    }

    fn evaluate(&self, ctx: &Context, condition: &Condition) -> bool {
        let Some(weather) = ctx.weather.as_ref() else {
            return false;
        };
        let actual = resolve(weather, &condition.field);
        compare(actual.as_ref(), condition.operator, &condition.value)
    }
}
