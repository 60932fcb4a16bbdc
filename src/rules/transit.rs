/// Conditions against the nearest bus or subway arrival.
///
/// Dispatch follows the condition's own data source, not whichever arrival
/// list happens to be populated. Only the first (nearest) arrival is
/// inspected; a rule like "next bus within 5 min" is about that one bus.
///
///   BUS_ARRIVAL    → arrivalTime, routeName, remainingStops
///   SUBWAY_ARRIVAL → arrivalTime, direction, destination, lineId
use super::{compare, integer, text, Condition, ConditionEvaluator, DataSource};
use crate::context::{BusArrival, Context, SubwayArrival};
use serde_json::Value;

#[derive(Debug, Default, Clone, Copy)]
pub struct TransitEvaluator;

fn resolve_bus(bus: &BusArrival, field: &str) -> Option<Value> {
    match field {
        "arrivalTime"    => integer(bus.arrival_time),
        "routeName"      => text(bus.route_name.as_ref()),
        "remainingStops" => integer(bus.remaining_stops),
        _ => None,
    }
}

fn resolve_subway(train: &SubwayArrival, field: &str) -> Option<Value> {
    match field {
        "arrivalTime" => integer(train.arrival_time),
        "direction"   => text(train.direction.as_ref()),
        "destination" => text(train.destination.as_ref()),
        "lineId"      => text(train.line_id.as_ref()),
        _ => None,
    }
}

impl ConditionEvaluator for TransitEvaluator {
    fn can_evaluate(&self, source: DataSource) -> bool {
        matches!(source, DataSource::BusArrival | DataSource::SubwayArrival)
    }

    fn evaluate(&self, ctx: &Context, condition: &Condition) -> bool {
        let actual = match condition.data_source {
            DataSource::BusArrival => ctx
                .first_bus()
                .and_then(|bus| resolve_bus(bus, &condition.field)),
            DataSource::SubwayArrival => ctx
                .first_subway()
                .and_then(|train| resolve_subway(train, &condition.field)),
            _ => None,
        };
        compare(actual.as_ref(), condition.operator, &condition.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Operator;
    use chrono::Utc;
    use serde_json::json;

    fn bus(route: &str, minutes: i64) -> BusArrival {
        BusArrival {
            stop_id:         "23-290".into(),
            route_id:        format!("r-{}", route),
            route_name:      Some(route.into()),
            arrival_time:    Some(minutes),
            remaining_stops: Some(3),
        }
    }

    fn train(minutes: i64) -> SubwayArrival {
        SubwayArrival {
            station_id:   "0222".into(),
            line_id:      Some("2".into()),
            direction:    Some("내선".into()),
            arrival_time: Some(minutes),
            destination:  Some("성수".into()),
        }
    }

    #[test]
    fn uses_only_nearest_bus() {
        let mut ctx = Context::new("u", "a", Utc::now());
        ctx.bus_arrivals = vec![bus("472", 12), bus("146", 2)];
        let ev = TransitEvaluator;

        let soon = Condition::new(DataSource::BusArrival, "arrivalTime", Operator::Lte, json!(5));
        assert!(!ev.evaluate(&ctx, &soon), "second arrival must be ignored");

        let route = Condition::new(DataSource::BusArrival, "routeName", Operator::Eq, json!("472"));
        assert!(ev.evaluate(&ctx, &route));

        let stops = Condition::new(DataSource::BusArrival, "remainingStops", Operator::Lt, json!(4));
        assert!(ev.evaluate(&ctx, &stops));
    }

    #[test]
    fn dispatches_on_condition_source() {
        let mut ctx = Context::new("u", "a", Utc::now());
        ctx.subway_arrivals = vec![train(4)];
        let ev = TransitEvaluator;

        // The bus list is empty even though subway data is there.
        let bus_cond = Condition::new(DataSource::BusArrival, "arrivalTime", Operator::Lt, json!(10));
        assert!(!ev.evaluate(&ctx, &bus_cond));

        let sub = |field: &str, op, v| Condition::new(DataSource::SubwayArrival, field, op, v);
        assert!(ev.evaluate(&ctx, &sub("arrivalTime", Operator::Lt, json!(10))));
        assert!(ev.evaluate(&ctx, &sub("lineId", Operator::Eq, json!("2"))));
        assert!(ev.evaluate(&ctx, &sub("direction", Operator::Eq, json!("내선"))));
        assert!(ev.evaluate(&ctx, &sub("destination", Operator::Contains, json!("성"))));
        assert!(!ev.evaluate(&ctx, &sub("routeName", Operator::Neq, json!("x"))));
    }

    #[test]
    fn empty_arrivals_are_false() {
        let ctx = Context::new("u", "a", Utc::now());
        let ev = TransitEvaluator;
        let c = Condition::new(DataSource::SubwayArrival, "arrivalTime", Operator::Gte, json!(0));
        assert!(!ev.evaluate(&ctx, &c));
        assert!(ev.can_evaluate(DataSource::BusArrival));
        assert!(ev.can_evaluate(DataSource::SubwayArrival));
        assert!(!ev.can_evaluate(DataSource::Weather));
    }
}
