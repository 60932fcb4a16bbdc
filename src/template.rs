/// Message templating: `{{namespace.field}}` substitution against a context.
///
/// Every occurrence of a token is replaced. A token whose source data is
/// missing (no weather block, empty arrival list, null field) is left in the
/// output exactly as written. Rendering never fails.
///
/// Known tokens:
///   weather.temperature|condition|humidity|windSpeed|location
///   airQuality.pm10|pm25|aqi|status
///   busArrival.arrivalTime|routeName            (nearest bus)
///   subwayArrival.arrivalTime|destination       (nearest train)
///   subwayStationName, busStopName
///   transit.comparison                          (computed, see below)
use crate::context::Context;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{([A-Za-z][A-Za-z0-9]*(?:\.[A-Za-z][A-Za-z0-9]*)?)\}\}").expect("token regex")
});

/// Arrival gap (minutes) at or below which bus and subway count as a tie.
pub const COMPARISON_TIE_MINUTES: u64 = 2;

const BUS_LABEL:    &str = "버스";
const SUBWAY_LABEL: &str = "지하철";
// Subject-marked forms for the "faster" slot.
const BUS_SUBJECT:    &str = "버스가";
const SUBWAY_SUBJECT: &str = "지하철이";

pub fn render(template: &str, ctx: &Context) -> String {
    TOKEN_RE
        .replace_all(template, |caps: &Captures| {
            resolve(&caps[1], ctx).unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

fn resolve(token: &str, ctx: &Context) -> Option<String> {
    match token.split_once('.') {
        Some(("weather", field)) => {
            let w = ctx.weather.as_ref()?;
            match field {
                "temperature" => w.temperature.map(fmt_num),
                "condition"   => w.condition.clone(),
                "humidity"    => w.humidity.map(fmt_num),
                "windSpeed"   => w.wind_speed.map(fmt_num),
                "location"    => w.location.clone(),
                _ => None,
            }
        }
        Some(("airQuality", field)) => {
            let aq = ctx.air_quality.as_ref()?;
            match field {
                "pm10"   => aq.pm10.map(fmt_num),
                "pm25"   => aq.pm25.map(fmt_num),
                "aqi"    => aq.aqi.map(fmt_num),
                "status" => aq.status.clone(),
                _ => None,
            }
        }
        Some(("busArrival", field)) => {
            let bus = ctx.first_bus()?;
            match field {
                "arrivalTime" => bus.arrival_time.map(|m| m.to_string()),
                "routeName"   => bus.route_name.clone(),
                _ => None,
            }
        }
        Some(("subwayArrival", field)) => {
            let train = ctx.first_subway()?;
            match field {
                "arrivalTime" => train.arrival_time.map(|m| m.to_string()),
                "destination" => train.destination.clone(),
                _ => None,
            }
        }
        Some(("transit", "comparison")) => Some(transit_comparison(ctx)),
        Some(_) => None,
        None => match token {
            "subwayStationName" => ctx.subway_station_name.clone(),
            "busStopName"       => ctx.bus_stop_name.clone(),
            _ => None,
        },
    }
}

/// "Which is faster" sentence for the nearest bus vs the nearest train.
/// Empty when either side has no arrival.
pub fn transit_comparison(ctx: &Context) -> String {
    let bus    = ctx.first_bus().and_then(|b| b.arrival_time);
    let subway = ctx.first_subway().and_then(|s| s.arrival_time);
    let (Some(bus), Some(subway)) = (bus, subway) else {
        return String::new();
    };

    let diff = bus.abs_diff(subway);
    if diff <= COMPARISON_TIE_MINUTES {
        return format!("{}와 {} 도착 시간이 비슷해요", BUS_LABEL, SUBWAY_LABEL);
    }

    let (faster, slower) = if bus < subway {
        (BUS_SUBJECT, SUBWAY_LABEL)
    } else {
        (SUBWAY_SUBJECT, BUS_LABEL)
    };
    format!("{} {}보다 {}분 빨라요", faster, slower, diff)
}

/// Whole numbers print without a fractional part (5.0 → "5").
fn fmt_num(v: f64) -> String {
    format!("{}", v)
}
