/// Diagnostic metadata attached to every recommendation.
///
/// Informational only: the engine never branches on it. Serialises as
///   { "ruleCategory": "WEATHER", "evaluatedAt": "2026-01-05T07:30:00.000Z",
///     "weatherData": { "temperature": 5, "condition": "Clear" },
///     "airQualityData": { "pm10": 40, "pm25": 18, "status": "보통" } }
/// with the projections omitted when the signal is absent.
use crate::{context::Context, rules::{Rule, RuleCategory}};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub temperature: Option<f64>,
    pub condition:   Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualitySnapshot {
    pub pm10:   Option<f64>,
    pub pm25:   Option<f64>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationMetadata {
    pub rule_category: RuleCategory,
    /// ISO-8601 of the context timestamp, millisecond precision, UTC `Z`.
    pub evaluated_at:  String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_data:     Option<WeatherSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_quality_data: Option<AirQualitySnapshot>,
}

pub fn extract(rule: &Rule, ctx: &Context) -> RecommendationMetadata {
    RecommendationMetadata {
        rule_category: rule.category,
        evaluated_at:  ctx.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        weather_data:  ctx.weather.as_ref().map(|w| WeatherSnapshot {
            temperature: w.temperature,
            condition:   w.condition.clone(),
        }),
        air_quality_data: ctx.air_quality.as_ref().map(|aq| AirQualitySnapshot {
            pm10:   aq.pm10,
            pm25:   aq.pm25,
            status: aq.status.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AirQualityData, WeatherData};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn rule() -> Rule {
        Rule {
            id:               "r".into(),
            name:             "r".into(),
            category:         RuleCategory::AirQuality,
            priority:         1,
            conditions:       vec![],
            message_template: String::new(),
            enabled:          true,
        }
    }

    #[test]
    fn always_has_category_and_timestamp() {
        let ts  = Utc.with_ymd_and_hms(2026, 1, 5, 7, 30, 0).unwrap();
        let ctx = Context::new("u", "a", ts);
        let meta = extract(&rule(), &ctx);

        assert_eq!(meta.rule_category, RuleCategory::AirQuality);
        assert_eq!(meta.evaluated_at, "2026-01-05T07:30:00.000Z");
        assert!(meta.weather_data.is_none());
        assert!(meta.air_quality_data.is_none());

        let v = serde_json::to_value(&meta).unwrap();
        assert_eq!(v, json!({ "ruleCategory": "AIR_QUALITY", "evaluatedAt": "2026-01-05T07:30:00.000Z" }));
    }

    #[test]
    fn projects_present_signals() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 5, 7, 30, 0).unwrap();
        let mut ctx = Context::new("u", "a", ts);
        ctx.weather = Some(WeatherData {
            temperature: Some(5.0),
            condition:   Some("Clear".into()),
            humidity:    Some(30.0),
            ..Default::default()
        });
        ctx.air_quality = Some(AirQualityData {
            pm10:   Some(40.0),
            pm25:   Some(18.0),
            aqi:    Some(55.0),
            status: Some("보통".into()),
            ..Default::default()
        });

        let v = serde_json::to_value(extract(&rule(), &ctx)).unwrap();
        assert_eq!(v["weatherData"], json!({ "temperature": 5.0, "condition": "Clear" }));
        assert_eq!(v["airQualityData"], json!({ "pm10": 40.0, "pm25": 18.0, "status": "보통" }));
    }
}
