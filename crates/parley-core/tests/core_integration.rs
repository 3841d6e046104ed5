#![allow(clippy::unwrap_used, clippy::expect_used)]

use parley_core::*;

#[test]
fn message_serialization_roundtrip() {
    let msg = Message::model("hi there");

    let json = serde_json::to_string(&msg).unwrap();
    let deserialized: Message = serde_json::from_str(&json).unwrap();

    assert_eq!(deserialized.id, msg.id);
    assert_eq!(deserialized.role, Role::Model);
    assert_eq!(deserialized.content, "hi there");
    assert_eq!(deserialized.timestamp, msg.timestamp);
}

#[test]
fn message_constructors_assign_roles() {
    assert_eq!(Message::user("a").role, Role::User);
    assert_eq!(Message::model("b").role, Role::Model);
    assert_eq!(Message::system("c").role, Role::System);
}

#[test]
fn messages_get_distinct_ids() {
    let a = Message::user("same");
    let b = Message::user("same");
    assert_ne!(a.id, b.id);
}

#[test]
fn json_error_converts_into_parley_error() {
    let parse = serde_json::from_str::<Role>("\"assistant\"").unwrap_err();
    let err: ParleyError = parse.into();
    assert!(err.to_string().starts_with("JSON error"));
}
