/// Point-in-time signal snapshot handed to the rule engine.
///
/// The context-assembly side (weather / air-quality / transit fetchers) builds
/// one of these per alert firing. Anything it could not fetch is simply left
/// out: a missing block or a `null` field is what makes conditions fail closed,
/// so never fill gaps with sentinel values like `0` or `""`.
///
/// JSON shape (camelCase, matching the alert service):
///   {
///     "userId": "u-1", "alertId": "a-1", "timestamp": "2026-01-05T07:30:00Z",
///     "weather":    { "temperature": 5, "condition": "Clear", ... },
///     "airQuality": { "pm10": 40, "pm25": 18, "aqi": 55, "status": "보통" },
///     "busArrivals":    [ { "routeName": "472", "arrivalTime": 3, ... } ],
///     "subwayArrivals": [ { "lineId": "2", "arrivalTime": 5, ... } ],
///     "subwayStationName": "강남", "busStopName": "강남역"
///   }
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Signal blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherData {
    /// Degrees Celsius
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Provider condition label, e.g. "Clear", "Rain", "Snow"
    #[serde(default)]
    pub condition:   Option<String>,
    /// Relative humidity in percent
    #[serde(default)]
    pub humidity:    Option<f64>,
    /// Metres per second
    #[serde(default)]
    pub wind_speed:  Option<f64>,
    #[serde(default)]
    pub location:    Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityData {
    #[serde(default)]
    pub pm10:     Option<f64>,
    #[serde(default)]
    pub pm25:     Option<f64>,
    #[serde(default)]
    pub aqi:      Option<f64>,
    /// Grade label, e.g. "좋음", "보통", "나쁨"
    #[serde(default)]
    pub status:   Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusArrival {
    #[serde(default)]
    pub stop_id:         String,
    #[serde(default)]
    pub route_id:        String,
    #[serde(default)]
    pub route_name:      Option<String>,
    /// Minutes until arrival
    #[serde(default)]
    pub arrival_time:    Option<i64>,
    #[serde(default)]
    pub remaining_stops: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubwayArrival {
    #[serde(default)]
    pub station_id:   String,
    #[serde(default)]
    pub line_id:      Option<String>,
    /// "상행" / "하행" or provider equivalent
    #[serde(default)]
    pub direction:    Option<String>,
    /// Minutes until arrival
    #[serde(default)]
    pub arrival_time: Option<i64>,
    #[serde(default)]
    pub destination:  Option<String>,
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub user_id:   String,
    pub alert_id:  String,
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub weather:     Option<WeatherData>,
    #[serde(default)]
    pub air_quality: Option<AirQualityData>,

    /// Ordered nearest-first by the transit fetcher.
    #[serde(default)]
    pub bus_arrivals:    Vec<BusArrival>,
    /// Ordered nearest-first by the transit fetcher.
    #[serde(default)]
    pub subway_arrivals: Vec<SubwayArrival>,

    #[serde(default)]
    pub subway_station_name: Option<String>,
    #[serde(default)]
    pub bus_stop_name:       Option<String>,
}

impl Context {
    /// Empty snapshot: no signals at all.
    pub fn new(user_id: impl Into<String>, alert_id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            user_id:             user_id.into(),
            alert_id:            alert_id.into(),
            timestamp,
            weather:             None,
            air_quality:         None,
            bus_arrivals:        Vec::new(),
            subway_arrivals:     Vec::new(),
            subway_station_name: None,
            bus_stop_name:       None,
        }
    }

    /// Nearest bus, if any. Later arrivals are never consulted by rules.
    pub fn first_bus(&self) -> Option<&BusArrival> {
        self.bus_arrivals.first()
    }

    /// Nearest train, if any.
    pub fn first_subway(&self) -> Option<&SubwayArrival> {
        self.subway_arrivals.first()
    }
}
