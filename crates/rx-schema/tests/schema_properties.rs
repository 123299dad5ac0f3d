//! Integration tests: end-to-end compile-and-check behavior of the core
//! types, driven through the public `Registry` API.

use rx_schema::{CheckerKind, DefinitionError, Registry, RxError};
use serde_json::{json, Value};

fn accepts(schema: &Value, value: &Value) -> bool {
    Registry::new().compile(schema).unwrap().is_valid(value)
}

#[test]
fn test_every_core_short_name_expands_to_its_uri() {
    let registry = Registry::new();
    for sub in [
        "all", "any", "arr", "bool", "def", "fail", "int", "map", "nil", "num", "one", "rec",
        "seq", "str",
    ] {
        let uri = registry.expand_uri(&format!("//{sub}")).unwrap();
        assert_eq!(uri, format!("tag:codesimply.com,2008:rx/core/{sub}"));
        assert_eq!(registry.expand_uri(&uri).unwrap(), uri);
        assert!(registry.has_type(&uri));
    }
}

#[test]
fn test_same_schema_compiles_to_independent_equivalent_checkers() {
    let registry = Registry::new();
    let schema = json!({"type": "//arr", "contents": {"type": "//int", "range": {"min": 0}}});
    let a = registry.compile(&schema).unwrap();
    let b = registry.compile(&schema).unwrap();
    for value in [json!([]), json!([0, 1]), json!([-1]), json!("x"), json!([1.5])] {
        assert_eq!(a.is_valid(&value), b.is_valid(&value), "{value}");
    }
}

#[test]
fn test_duplicate_registrations_leave_state_unchanged() {
    let mut registry = Registry::new();
    registry.add_prefix("x", "tag:example.com,2024:x/").unwrap();
    registry.learn_type("/x/name", &json!("//str")).unwrap();
    let uris_before = registry.type_uris().len();
    let prefixes_before = registry.prefixes().len();

    assert!(matches!(
        registry.register_native_type(CheckerKind::Map),
        Err(DefinitionError::DuplicateType(_))
    ));
    assert!(matches!(
        registry.learn_type("/x/name", &json!("//int")),
        Err(DefinitionError::DuplicateType(_))
    ));
    assert!(matches!(
        registry.add_prefix("x", "tag:example.com,2024:other/"),
        Err(DefinitionError::DuplicatePrefix(_))
    ));

    assert_eq!(registry.type_uris().len(), uris_before);
    assert_eq!(registry.prefixes().len(), prefixes_before);
    assert!(registry.compile(&json!("/x/name")).unwrap().is_valid(&json!("s")));
}

#[test]
fn test_integer_and_number_ranges() {
    for ty in ["//int", "//num"] {
        let inclusive = json!({"type": ty, "range": {"min": 0, "max": 10}});
        assert!(accepts(&inclusive, &json!(0)));
        assert!(accepts(&inclusive, &json!(10)));
        assert!(!accepts(&inclusive, &json!(-1)));
        assert!(!accepts(&inclusive, &json!(11)));

        let exclusive = json!({"type": ty, "range": {"min-exclusive": 0, "max-exclusive": 10}});
        assert!(!accepts(&exclusive, &json!(0)));
        assert!(!accepts(&exclusive, &json!(10)));
        assert!(accepts(&exclusive, &json!(1)));
        assert!(accepts(&exclusive, &json!(9)));
    }
}

#[test]
fn test_string_pattern_substring_match() {
    assert!(accepts(&json!({"type": "//str", "pattern": "ab"}), &json!("xaby")));
}

#[test]
fn test_array_length_and_contents() {
    let schema = json!({"type": "//arr", "contents": {"type": "//int"}, "length": {"min": 1, "max": 3}});
    assert!(accepts(&schema, &json!([1, 2])));
    assert!(!accepts(&schema, &json!([])));
    assert!(!accepts(&schema, &json!(["x"])));
    assert!(!accepts(&schema, &json!([1, 2, 3, 4])));
}

#[test]
fn test_record_required_optional_unknown() {
    let registry = Registry::new();
    let rec = registry
        .compile(&json!({
            "type": "//rec",
            "required": {"name": {"type": "//str"}},
            "optional": {"age": {"type": "//int"}}
        }))
        .unwrap();

    assert!(rec.is_valid(&json!({"name": "a"})));

    let missing = rec.check(&json!({"age": 3})).unwrap_err();
    assert_eq!(missing.checker, CheckerKind::Record);
    assert!(missing.path.segments().is_empty());
    assert!(missing.message.contains("name"));

    let unknown = rec.check(&json!({"name": "a", "extra": 1})).unwrap_err();
    assert_eq!(unknown.checker, CheckerKind::Record);
    assert!(unknown.message.contains("extra"));
}

#[test]
fn test_fixed_sequence_length_rules() {
    let schema = json!({"type": "//seq", "contents": [{"type": "//str"}, {"type": "//int"}]});
    assert!(accepts(&schema, &json!(["a", 1])));
    assert!(!accepts(&schema, &json!(["a"])));
    assert!(!accepts(&schema, &json!(["a", 1, 2])));
}

#[test]
fn test_any_of_wildcard_and_aggregate() {
    for value in [json!(null), json!(true), json!([]), json!({"k": "v"})] {
        assert!(accepts(&json!({"type": "//any"}), &value));
    }

    let registry = Registry::new();
    let any = registry
        .compile(&json!({"type": "//any", "of": [{"type": "//int"}, {"type": "//str"}]}))
        .unwrap();
    assert!(any.is_valid(&json!(1)));
    assert!(any.is_valid(&json!("x")));

    for value in [json!(true), json!(null)] {
        let err = any.check(&value).unwrap_err();
        assert_eq!(err.causes.len(), 2);
        assert_eq!(err.causes[0].checker, CheckerKind::Integer);
        assert_eq!(err.causes[1].checker, CheckerKind::String);
        assert!(err.message.contains(&err.causes[0].to_string()));
        assert!(err.message.contains(&err.causes[1].to_string()));
    }
}

#[test]
fn test_deep_failure_path() {
    let registry = Registry::new();
    let schema = json!({
        "type": "//rec",
        "required": {
            "items": {
                "type": "//arr",
                "contents": {"type": "//rec", "required": {"name": "//str"}}
            }
        }
    });
    let value = json!({"items": [{"name": "a"}, {"name": "b"}, {"name": "c"}, {"name": 4}]});
    let err = registry.compile(&schema).unwrap().check(&value).unwrap_err();
    assert_eq!(err.path.to_string(), ".items[3].name");
    assert_eq!(err.value, json!(4));
    assert_eq!(err.checker, CheckerKind::String);
}

#[test]
fn test_learned_types_resolve_transitively() {
    let mut registry = Registry::new();
    registry.add_prefix("geo", "tag:example.com,2024:geo/").unwrap();
    registry
        .learn_type("/geo/coord", &json!({"type": "//num", "range": {"min": -180, "max": 180}}))
        .unwrap();
    registry
        .learn_type(
            "/geo/point",
            &json!({"type": "//seq", "contents": ["/geo/coord", "/geo/coord"]}),
        )
        .unwrap();
    registry
        .learn_type("/geo/path", &json!({"type": "//arr", "contents": "/geo/point"}))
        .unwrap();

    let path = registry.compile(&json!("/geo/path")).unwrap();
    assert!(path.is_valid(&json!([[0, 0], [10.5, -20]])));
    let err = path.check(&json!([[0, 0], [0, 200]])).unwrap_err();
    assert_eq!(err.path.to_string(), "[1][1]");
    assert_eq!(err.checker, CheckerKind::Number);
}

#[test]
fn test_learned_type_must_exist_before_reference() {
    let mut registry = Registry::new();
    let err = registry
        .learn_type("tag:example.com:outer", &json!("tag:example.com:inner"))
        .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::UnknownType("tag:example.com:inner".to_string())
    );
}

#[test]
fn test_schema_from_yaml_document() {
    let schema: Value = serde_yaml::from_str(
        r#"
type: //rec
required:
  name: //str
  tags:
    type: //arr
    contents: { type: //str, length: { min: 1 } }
optional:
  port: { type: //int, range: { min: 1, max: 65535 } }
"#,
    )
    .unwrap();
    let registry = Registry::new();
    assert!(registry
        .validate(&schema, &json!({"name": "svc", "tags": ["a"], "port": 443}))
        .is_ok());
    match registry.validate(&schema, &json!({"name": "svc", "tags": [""]})) {
        Err(RxError::Validation(err)) => assert_eq!(err.path.to_string(), ".tags[0]"),
        other => panic!("expected validation error, got {other:?}"),
    }
}
