use perch_core::{EventKind, Observable};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Serialize, Deserialize)]
struct Hunger {
    hunger: Observable<f32>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Dog {
    name: String,
    age: Observable<i64>,
    is_hungry: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    some_optional: Option<Observable<String>>,
    hunger: Hunger,
}

#[test]
fn observables_encode_as_bare_values() {
    let dog = Dog {
        name: "Aaron".to_string(),
        age: Observable::new(3000),
        is_hungry: true,
        some_optional: None,
        hunger: Hunger {
            hunger: Observable::new(10.6),
        },
    };

    let encoded = serde_json::to_string(&dog).expect("encode");
    let reparsed: serde_json::Value = serde_json::from_str(&encoded).expect("reparse");

    assert_eq!(
        reparsed,
        json!({"age": 3000, "isHungry": true, "hunger": {"hunger": 10.6}, "name": "Aaron"})
    );
}

#[test]
fn decoding_wraps_values_without_observers() {
    let input = r#"{"name":"Aaron","age":3000,"isHungry":true,"someOptional":"denise","hunger":{"hunger":10.6}}"#;

    let decoded: Dog = serde_json::from_str(input).expect("decode");

    assert_eq!(*decoded.age.value(), 3000);
    assert_eq!(*decoded.hunger.hunger, 10.6_f32);
    assert_eq!(
        decoded.some_optional.as_ref().map(|o| o.value().as_str()),
        Some("denise")
    );
    assert_eq!(decoded.age.observer_count(EventKind::WillChange), 0);
    assert_eq!(decoded.age.observer_count(EventKind::DidChange), 0);
}

#[test]
fn missing_optional_field_yields_no_observable() {
    let input = r#"{"name":"Aaron","age":3000,"isHungry":false,"hunger":{"hunger":1.5}}"#;

    let decoded: Dog = serde_json::from_str(input).expect("decode");

    assert!(decoded.some_optional.is_none());
}

#[test]
fn decode_errors_come_from_the_deserializer() {
    let input = r#"{"name":"Aaron","age":"old","isHungry":true,"hunger":{"hunger":10.6}}"#;

    let err = serde_json::from_str::<Dog>(input)
        .err()
        .expect("age must be an integer");

    assert!(err.is_data(), "unexpected error: {err}");
}

#[test]
fn bare_observable_round_trips_through_json() {
    let encoded = serde_json::to_string(&Observable::new(vec![1, 2, 3])).expect("encode");
    assert_eq!(encoded, "[1,2,3]");

    let decoded: Observable<Vec<u8>> = serde_json::from_str(&encoded).expect("decode");
    assert_eq!(decoded.value(), &vec![1, 2, 3]);
}
