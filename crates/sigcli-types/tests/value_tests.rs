use sigcli_types::*;

#[test]
fn test_str_rendering_of_scalars() {
    insta::assert_snapshot!(Value::None.to_string(), @"None");
    insta::assert_snapshot!(Value::Bool(true).to_string(), @"True");
    insta::assert_snapshot!(Value::Int(-7).to_string(), @"-7");
    insta::assert_snapshot!(Value::Float(2.0).to_string(), @"2.0");
    insta::assert_snapshot!(Value::from("hi there").to_string(), @"hi there");
}

#[test]
fn test_str_rendering_of_containers_uses_repr_of_elements() {
    let list = Value::list([Value::from("a"), Value::Int(1), Value::None]);
    insta::assert_snapshot!(list.to_string(), @"['a', 1, None]");

    let single = Value::tuple([Value::from("t0")]);
    insta::assert_snapshot!(single.to_string(), @"('t0',)");

    insta::assert_snapshot!(Value::tuple([]).to_string(), @"()");
    insta::assert_snapshot!(Value::set([]).to_string(), @"set()");
    insta::assert_snapshot!(Value::frozenset([]).to_string(), @"frozenset()");

    let frozen = Value::frozenset([Value::Int(2), Value::Int(1)]);
    insta::assert_snapshot!(frozen.to_string(), @"frozenset({1, 2})");

    let dict = Value::dict([
        (Value::from("k"), Value::list([Value::Float(0.5)])),
        (Value::Int(3), Value::Bool(false)),
    ]);
    insta::assert_snapshot!(dict.to_string(), @"{'k': [0.5], 3: False}");
}

#[test]
fn test_repr_quotes_strings() {
    insta::assert_snapshot!(Value::from("it's").repr(), @r#""it's""#);
    insta::assert_snapshot!(Value::from("a\nb").repr(), @r"'a\nb'");
    assert_eq!(Value::from("plain").repr(), "'plain'");
}

#[test]
fn test_serialize_to_json() {
    let value = Value::dict([
        (Value::from("ports"), Value::set([Value::Int(80), Value::Int(443)])),
        (Value::Int(1), Value::tuple([Value::None, Value::Bool(true)])),
    ]);
    let json = serde_json::to_value(&value).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "ports": [80, 443],
            "1": [null, true],
        })
    );
}

#[test]
fn test_coercion_error_names_value_and_target() {
    let err = CoercionError::new(&Value::from("x"), &TypeExpr::list(TypeExpr::Int));
    assert_eq!(err.to_string(), "cannot coerce 'x' to list[int]");

    let err = err.with_reason("not a list");
    assert_eq!(err.to_string(), "cannot coerce 'x' to list[int]: not a list");
}

#[test]
fn test_annotation_into_parts() {
    let (ty, help) = Annotation::annotated(TypeExpr::Int, "how many").into_parts();
    assert_eq!(ty, TypeExpr::Int);
    assert_eq!(help.as_deref(), Some("how many"));

    let (ty, help) = Annotation::from(TypeExpr::Str).into_parts();
    assert_eq!(ty, TypeExpr::Str);
    assert!(help.is_none());
}
