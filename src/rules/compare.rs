/// Operator table shared by every condition evaluator.
///
/// Equality is strict: numbers compare by value (so `10` matches `10.0`),
/// strings/bools by content, and arrays/objects never equal anything.
/// A missing or `null` actual value fails every operator, `eq` and `neq`
/// included, so there is no way to match "field is absent".
use super::Operator;
use serde_json::Value;

pub fn compare(actual: Option<&Value>, operator: Operator, expected: &Value) -> bool {
    let Some(actual) = actual.filter(|v| !v.is_null()) else {
        return false;
    };

    match operator {
        Operator::Eq       => strict_eq(actual, expected),
        Operator::Neq      => !strict_eq(actual, expected),
        Operator::Gt       => numeric(actual, expected, |a, e| a > e),
        Operator::Gte      => numeric(actual, expected, |a, e| a >= e),
        Operator::Lt       => numeric(actual, expected, |a, e| a < e),
        Operator::Lte      => numeric(actual, expected, |a, e| a <= e),
        Operator::Contains => match (actual.as_str(), expected.as_str()) {
            (Some(a), Some(e)) => a.to_lowercase().contains(&e.to_lowercase()),
            _ => false,
        },
        Operator::In => expected
            .as_array()
            .is_some_and(|items| items.iter().any(|item| strict_eq(actual, item))),
        Operator::Between => between(actual, expected),
        Operator::Unknown => false,
    }
}

fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x),   Value::Bool(y))   => x == y,
        (Value::Null,      Value::Null)      => true,
        _ => false,
    }
}

fn numeric(actual: &Value, expected: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(e)) => cmp(a, e),
        _ => false,
    }
}

/// Inclusive `[min, max]`; anything but a numeric 2-element array is false.
fn between(actual: &Value, expected: &Value) -> bool {
    let Some(a) = actual.as_f64() else {
        return false;
    };
    match expected.as_array().map(Vec::as_slice) {
        Some([min, max]) => match (min.as_f64(), max.as_f64()) {
            (Some(min), Some(max)) => a >= min && a <= max,
            _ => false,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(actual: Value, op: Operator, expected: Value) -> bool {
        compare(Some(&actual), op, &expected)
    }

    #[test]
    fn equality_is_strict() {
        assert!(check(json!(10), Operator::Eq, json!(10.0)));
        assert!(check(json!("Rain"), Operator::Eq, json!("Rain")));
        assert!(!check(json!("rain"), Operator::Eq, json!("Rain")));
        assert!(!check(json!("10"), Operator::Eq, json!(10)));
        assert!(!check(json!([1]), Operator::Eq, json!([1])));
        assert!(check(json!("10"), Operator::Neq, json!(10)));
        assert!(!check(json!(3), Operator::Neq, json!(3)));
    }

    #[test]
    fn ordering_requires_numbers() {
        assert!(check(json!(5), Operator::Lt, json!(10)));
        assert!(check(json!(10), Operator::Lte, json!(10)));
        assert!(check(json!(10.5), Operator::Gt, json!(10)));
        assert!(check(json!(10), Operator::Gte, json!(10)));
        assert!(!check(json!("5"), Operator::Lt, json!(10)));
        assert!(!check(json!(5), Operator::Lt, json!("10")));
        assert!(!check(json!(5), Operator::Gt, json!(null)));
        assert!(!check(json!(true), Operator::Gte, json!(0)));
    }

    #[test]
    fn contains_is_case_insensitive_on_strings_only() {
        assert!(check(json!("Light Rain"), Operator::Contains, json!("rain")));
        assert!(check(json!("강남역 방면"), Operator::Contains, json!("강남")));
        assert!(!check(json!("Clear"), Operator::Contains, json!("rain")));
        assert!(!check(json!(123), Operator::Contains, json!("2")));
        assert!(!check(json!("123"), Operator::Contains, json!(2)));
    }

    #[test]
    fn in_is_array_membership() {
        assert!(check(json!("Snow"), Operator::In, json!(["Rain", "Snow"])));
        assert!(check(json!(2), Operator::In, json!([1, 2.0, 3])));
        assert!(!check(json!("snow"), Operator::In, json!(["Rain", "Snow"])));
        assert!(!check(json!("Snow"), Operator::In, json!("Snow")));
    }

    #[test]
    fn between_is_inclusive_pair() {
        assert!(check(json!(10), Operator::Between, json!([10, 20])));
        assert!(check(json!(20), Operator::Between, json!([10, 20])));
        assert!(check(json!(15.5), Operator::Between, json!([10, 20])));
        assert!(!check(json!(21), Operator::Between, json!([10, 20])));
        assert!(!check(json!(15), Operator::Between, json!([10])));
        assert!(!check(json!(15), Operator::Between, json!([10, 20, 30])));
        assert!(!check(json!(15), Operator::Between, json!(["10", "20"])));
        assert!(!check(json!("15"), Operator::Between, json!([10, 20])));
    }

    #[test]
    fn unknown_operator_is_false() {
        assert!(!check(json!(1), Operator::Unknown, json!(1)));
    }

    #[test]
    fn absent_actual_fails_every_operator() {
        let ops = [
            Operator::Eq, Operator::Neq, Operator::Gt, Operator::Gte, Operator::Lt,
            Operator::Lte, Operator::Contains, Operator::In, Operator::Between,
        ];
        for op in ops {
            assert!(!compare(None, op, &json!(null)), "{:?} on None", op);
            assert!(!compare(Some(&Value::Null), op, &json!(null)), "{:?} on null", op);
            assert!(!compare(Some(&Value::Null), op, &json!([null])), "{:?} on null", op);
        }
    }
}
