//! End-to-end behavior of compiled form schemas: password confirmation,
//! select membership, optional fields, error accumulation, compile-time
//! rejection of malformed definitions, and purity of compile/validate.

use formwork_schema::{
    compile, messages, validate, CompileError, DiagnosticKind, FieldDescriptor, FormDefinition,
    PasswordField, RuleDescriptor, SchemaCache, SelectField, SelectOption, TextAreaField,
    TextField, TextKind, ValidationOutcome,
};
use serde_json::{json, Map, Value};

fn record(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("record must be an object, got {other}"),
    }
}

fn role_select() -> FieldDescriptor {
    SelectField::new(
        "role",
        "Role",
        [SelectOption::new("Admin", "admin"), SelectOption::new("User", "user")],
    )
    .into()
}

#[test]
fn password_confirmation_match_and_mismatch() {
    let fields = vec![FieldDescriptor::from(
        PasswordField::new("password", "Password").with_confirmation(),
    )];
    let schema = compile(&fields).unwrap();

    let ok = schema.validate(&record(json!({
        "password": "Abcd1234",
        "passwordConfirm": "Abcd1234"
    })));
    assert!(ok.is_success(), "matching passwords must validate: {ok:?}");

    let mismatch = schema.validate(&record(json!({
        "password": "Abcd1234",
        "passwordConfirm": "xxxx"
    })));
    let errors = mismatch.errors().expect("mismatch must fail");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors["passwordConfirm"], messages::PASSWORDS_DO_NOT_MATCH);
}

#[test]
fn missing_confirmation_is_reported_on_companion() {
    let fields = vec![FieldDescriptor::from(
        PasswordField::new("secret", "Secret").with_confirmation(),
    )];
    let schema = compile(&fields).unwrap();
    let outcome = schema.validate(&record(json!({ "secret": "s3cret!" })));
    let errors = outcome.errors().unwrap();
    assert!(errors.contains_key("secretConfirm"));
    assert!(!errors.contains_key("secret"));
}

#[test]
fn only_first_confirmation_is_honored() {
    let fields: Vec<FieldDescriptor> = vec![
        PasswordField::new("password", "Password").with_confirmation().into(),
        PasswordField::new("pin", "PIN").with_confirmation().into(),
    ];
    let schema = compile(&fields).unwrap();
    assert!(schema.field("passwordConfirm").is_some());
    assert!(schema.field("pinConfirm").is_none());
    assert_eq!(
        schema.diagnostics()[0].kind,
        DiagnosticKind::ConfirmationIgnored
    );

    let outcome = schema.validate(&record(json!({
        "password": "a", "passwordConfirm": "a", "pin": "1234"
    })));
    assert!(outcome.is_success());
}

#[test]
fn select_membership() {
    let schema = compile(&[role_select()]).unwrap();
    assert!(schema.validate(&record(json!({ "role": "admin" }))).is_success());

    let outcome = schema.validate(&record(json!({ "role": "manager" })));
    assert_eq!(outcome.errors().unwrap()["role"], messages::INVALID_OPTION);
}

#[test]
fn select_without_options_fails_to_compile() {
    let fields = vec![FieldDescriptor::from(SelectField::new("role", "Role", []))];
    assert!(matches!(
        compile(&fields),
        Err(CompileError::EmptySelect { ref field }) if field == "role"
    ));
}

#[test]
fn unknown_rule_and_bad_value_fail_to_compile() {
    let unknown = vec![FieldDescriptor::from(TextField::new("a", "A"))
        .with_rule(RuleDescriptor::new("isbn", true, "not an isbn"))];
    assert!(matches!(compile(&unknown), Err(CompileError::UnknownRule { .. })));

    let bad_value = vec![FieldDescriptor::from(TextField::new("a", "A"))
        .with_rule(RuleDescriptor::new("min", "eight", "too short"))];
    assert!(matches!(
        compile(&bad_value),
        Err(CompileError::RuleValueMismatch { .. })
    ));
}

#[test]
fn integral_float_lengths_compile_from_json() {
    let form = FormDefinition::from_json_str(
        r#"{"fields":[{"type":"text","name":"u","label":"User",
            "validations":[{"type":"min","value":8.0,"message":"at least 8"}]}]}"#,
    )
    .unwrap();
    let schema = form.compile().unwrap();
    let outcome = schema.validate(&record(json!({ "u": "short" })));
    assert_eq!(outcome.errors().unwrap()["u"], "at least 8");
    assert!(schema.validate(&record(json!({ "u": "long enough" }))).is_success());
}

#[test]
fn phone_rejects_non_ascii_digits() {
    let fields = vec![FieldDescriptor::from(
        TextField::new("p", "Phone").with_kind(TextKind::Phone),
    )];
    let schema = compile(&fields).unwrap();
    let outcome = schema.validate(&record(json!({ "p": "٠١٢٣٤٥" })));
    assert_eq!(outcome.errors().unwrap()["p"], messages::INVALID_PHONE);
    assert!(schema.validate(&record(json!({ "p": "012345" }))).is_success());
}

#[test]
fn unsupported_field_kind_is_lenient() {
    let form = FormDefinition::from_json_str(
        r#"{"fields":[{"type":"colorpicker","name":"color","label":"Color"}]}"#,
    )
    .unwrap();
    let schema = form.compile().unwrap();
    assert_eq!(
        schema.diagnostics()[0].kind,
        DiagnosticKind::UnsupportedFieldKind
    );
    assert!(schema.validate(&record(json!({ "color": "#ff0000" }))).is_success());
    assert!(schema.validate(&record(json!({ "color": 16711680 }))).is_success());
}

#[test]
fn errors_accumulate_across_fields() {
    let fields: Vec<FieldDescriptor> = vec![
        FieldDescriptor::from(TextField::new("username", "Username"))
            .with_rule(RuleDescriptor::new("min", 3, "username too short")),
        FieldDescriptor::from(TextAreaField::new("bio", "Bio"))
            .with_rule(RuleDescriptor::new("max", 10, "bio too long")),
    ];
    let schema = compile(&fields).unwrap();
    let outcome = schema.validate(&record(json!({
        "username": "al",
        "bio": "this biography is far too long"
    })));
    let errors = outcome.errors().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors["username"], "username too short");
    assert_eq!(errors["bio"], "bio too long");
}

#[test]
fn first_failing_rule_wins_within_a_field() {
    let fields = vec![FieldDescriptor::from(TextField::new("code", "Code"))
        .with_rule(RuleDescriptor::new("length", 6, "must be 6 characters"))
        .with_rule(RuleDescriptor::flag("uppercase", "must be uppercase"))];
    let schema = compile(&fields).unwrap();

    let outcome = schema.validate(&record(json!({ "code": "abc" })));
    assert_eq!(outcome.errors().unwrap()["code"], "must be 6 characters");

    let outcome = schema.validate(&record(json!({ "code": "abcdef" })));
    assert_eq!(outcome.errors().unwrap()["code"], "must be uppercase");

    let outcome = schema.validate(&record(json!({ "code": "ABCDEF" })));
    assert_eq!(outcome.data().unwrap()["code"], "ABCDEF");
}

#[test]
fn optional_present_value_still_checked() {
    let fields = vec![FieldDescriptor::from(TextField::new("phone", "Phone").with_kind(TextKind::Phone))
        .optional()];
    let schema = compile(&fields).unwrap();
    assert!(schema.validate(&Map::new()).is_success());
    let outcome = schema.validate(&record(json!({ "phone": "call me" })));
    assert_eq!(outcome.errors().unwrap()["phone"], messages::INVALID_PHONE);
}

#[test]
fn free_function_matches_method() {
    let schema = compile(&[role_select()]).unwrap();
    let r = record(json!({ "role": "user" }));
    assert_eq!(validate(&schema, &r), schema.validate(&r));
}

#[test]
fn cached_and_fresh_schemas_agree() {
    let fields = vec![role_select()];
    let cache = SchemaCache::new();
    let cached = cache.get_or_compile(&fields).unwrap();
    let fresh = compile(&fields).unwrap();
    for value in ["admin", "user", "guest", ""] {
        let r = record(json!({ "role": value }));
        assert_eq!(cached.validate(&r), fresh.validate(&r));
    }
}

#[test]
fn schema_shared_across_threads() {
    let fields = vec![
        FieldDescriptor::from(TextField::new("email", "Email").with_kind(TextKind::Email)),
    ];
    let cache = SchemaCache::new();
    let schema = cache.get_or_compile(&fields).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let schema = std::sync::Arc::clone(&schema);
            std::thread::spawn(move || {
                let r = record(json!({ "email": format!("user{i}@example.com") }));
                schema.validate(&r)
            })
        })
        .collect();

    for handle in handles {
        assert!(matches!(handle.join().unwrap(), ValidationOutcome::Success { .. }));
    }
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn min_field(n: usize) -> Vec<FieldDescriptor> {
        vec![FieldDescriptor::from(TextField::new("f", "F"))
            .with_rule(RuleDescriptor::new("min", n as u64, "too short"))]
    }

    proptest! {
        /// An absent optional field never produces an error, whatever its rules.
        #[test]
        fn absent_optional_never_errors(min in 0usize..20, max in 0usize..20, prefix in "[a-z]{0,3}") {
            let fields = vec![FieldDescriptor::from(TextField::new("opt", "Opt"))
                .optional()
                .with_rule(RuleDescriptor::new("min", min as u64, "min"))
                .with_rule(RuleDescriptor::new("max", max as u64, "max"))
                .with_rule(RuleDescriptor::new("startsWith", prefix, "prefix"))];
            let schema = compile(&fields).unwrap();
            prop_assert!(schema.validate(&Map::new()).is_success());
        }

        /// Values shorter than `Min(n)` fail with the configured message.
        #[test]
        fn min_rule_rejects_short_values(n in 1usize..16, s in "[a-zA-Z0-9]{0,16}") {
            let schema = compile(&min_field(n)).unwrap();
            let outcome = schema.validate(&record(json!({ "f": s.clone() })));
            if s.chars().count() < n {
                prop_assert_eq!(outcome.errors().unwrap()["f"].as_str(), "too short");
            } else {
                prop_assert!(outcome.is_success());
            }
        }

        /// Compiling twice yields schemas that behave identically.
        #[test]
        fn compile_is_deterministic(n in 0usize..10, s in "\\PC{0,12}") {
            let a = compile(&min_field(n)).unwrap();
            let b = compile(&min_field(n)).unwrap();
            let r = record(json!({ "f": s }));
            prop_assert_eq!(a.validate(&r), b.validate(&r));
        }

        /// Validation is total: success, or a non-empty error map.
        #[test]
        fn validate_is_total(v in prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "\\PC{0,12}".prop_map(Value::String),
        ]) {
            let schema = compile(&[role_select()]).unwrap();
            match schema.validate(&record(json!({ "role": v }))) {
                ValidationOutcome::Success { data } => prop_assert!(data.contains_key("role")),
                ValidationOutcome::Failure { errors } => prop_assert!(!errors.is_empty()),
            }
        }
    }
}
