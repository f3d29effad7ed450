use dfe::core::*;
use rust_decimal_macros::dec;

fn key_fields(code: Option<&str>) -> KeyFields<'_> {
    KeyFields {
        state_code: "35",
        emitted_at: "2025-07-10T10:00:00-03:00",
        issuer_cnpj: "12345678000195",
        model: "55",
        series: "1",
        number: "123",
        emission_type: "1",
        numeric_code: code,
    }
}

// --- Check digit ---

#[test]
fn mod11_known_values() {
    assert_eq!(mod11_check_digit("123456789"), 7);
    assert_eq!(
        mod11_check_digit("3525071234567800019555001000000123112345678"),
        5
    );
}

#[test]
fn mod11_remainder_below_two_is_zero() {
    // 2*0 + ... = 0 -> remainder 0
    assert_eq!(mod11_check_digit("0000"), 0);
    // 1*2 = 2 -> 11 - 2 = 9
    assert_eq!(mod11_check_digit("1"), 9);
}

#[test]
fn mod11_validation() {
    assert!(mod11_is_valid("1234567897"));
    assert!(!mod11_is_valid("1234567890"));
}

// --- Access key ---

#[test]
fn access_key_components() {
    let key = generate_access_key(&key_fields(Some("12345678")), &RandomCode).unwrap();
    assert_eq!(key.as_str(), "35250712345678000195550010000001231123456785");
    assert_eq!(key.state_code(), "35");
    assert_eq!(key.year_month(), "2507");
    assert_eq!(key.issuer_cnpj(), "12345678000195");
    assert_eq!(key.numeric_code(), "12345678");
    assert_eq!(key.check_digit(), "5");
    assert_eq!(key.body().len(), 43);
    assert_eq!(key.to_string(), key.as_str());
}

#[test]
fn access_key_uses_code_source_when_payload_has_none() {
    let key = generate_access_key(&key_fields(None), &FixedCode(42)).unwrap();
    assert_eq!(key.numeric_code(), "00000042");

    let key = generate_access_key(&key_fields(Some("  ")), &|| 7u32).unwrap();
    assert_eq!(key.numeric_code(), "00000007");
}

#[test]
fn access_key_reduces_oversized_codes() {
    let key = generate_access_key(&key_fields(None), &FixedCode(1_234_567_890)).unwrap();
    assert_eq!(key.numeric_code(), "34567890");
    assert!(AccessKey::verify(key.as_str()));
}

#[test]
fn access_key_year_month_uses_utc() {
    let mut fields = key_fields(Some("1"));
    fields.emitted_at = "2025-12-31T22:00:00-03:00";
    let key = generate_access_key(&fields, &RandomCode).unwrap();
    assert_eq!(key.year_month(), "2601");
}

#[test]
fn access_key_rejects_unparseable_timestamp() {
    let mut fields = key_fields(Some("1"));
    fields.emitted_at = "not a date";
    assert!(matches!(
        generate_access_key(&fields, &RandomCode),
        Err(DfeError::Format(_))
    ));
}

#[test]
fn access_key_rejects_oversized_components() {
    let mut fields = key_fields(Some("1"));
    fields.number = "1234567890";
    assert!(matches!(
        generate_access_key(&fields, &RandomCode),
        Err(DfeError::Format(_))
    ));
}

#[test]
fn verify_rejects_wrong_length_and_digit() {
    assert!(AccessKey::verify("35250712345678000195550010000001231123456785"));
    assert!(!AccessKey::verify("35250712345678000195550010000001231123456784"));
    assert!(!AccessKey::verify("3525071234567800019555001000000123112345678"));
}

// --- Numbers and digits ---

#[test]
fn format_decimal_rounds_half_away_from_zero() {
    assert_eq!(format_decimal(&Numeric::from("2.345"), 2).unwrap(), "2.35");
    assert_eq!(format_decimal(&Numeric::from("-2.345"), 2).unwrap(), "-2.35");
    assert_eq!(format_decimal(&Numeric::from("1,5"), 0).unwrap(), "2");
    assert_eq!(format_decimal(&Numeric::from(10.0), 4).unwrap(), "10.0000");
    assert_eq!(format_decimal(&Numeric::from("-0.001"), 2).unwrap(), "0.00");
}

#[test]
fn format_decimal_rejects_garbage() {
    let err = format_decimal(&Numeric::from("abc"), 2).unwrap_err();
    assert!(matches!(err, DfeError::Format(_)));
    assert!(format_decimal(&Numeric::from(""), 2).is_err());
}

#[test]
fn parse_decimal_is_exact_for_strings() {
    assert_eq!(parse_decimal(&Numeric::from("0.1")).unwrap(), dec!(0.1));
    assert_eq!(parse_decimal(&Numeric::from(" 1234,56 ")).unwrap(), dec!(1234.56));
}

#[test]
fn digits_helpers() {
    assert_eq!(only_digits("123.456.789-09"), "12345678909");
    assert_eq!(pad_left(only_digits("7"), 9), "000000007");
}

// --- Open-ended values ---

#[test]
fn field_map_keeps_document_order() {
    let map: FieldMap = serde_json::from_str(r#"{"z": 1, "a": "x", "m": null}"#).unwrap();
    assert_eq!(map.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
    assert_eq!(
        serde_json::to_string(&map).unwrap(),
        r#"{"z":1,"a":"x","m":null}"#
    );
}

#[test]
fn field_map_renders_as_xml() {
    let map: FieldMap = serde_json::from_str(
        r#"{"PISAliq": {"CST": "01", "vBC": "100.00", "pPIS": 1.65, "obs": [{"x": "a"}, {"x": "b"}]}}"#,
    )
    .unwrap();
    let mut w = XmlWriter::fragment();
    w.map_element("PIS", &map).unwrap();
    assert_eq!(
        w.into_string().unwrap(),
        "<PIS><PISAliq><CST>01</CST><vBC>100.00</vBC><pPIS>1.65</pPIS>\
         <obs><x>a</x></obs><obs><x>b</x></obs></PISAliq></PIS>"
    );
}

#[test]
fn writer_escapes_text_and_attributes() {
    let mut w = XmlWriter::fragment();
    w.start_element_with_attrs("a", &[("t", "x\"y")]).unwrap();
    w.text("R&D <ltda>").unwrap();
    w.end_element("a").unwrap();
    assert_eq!(
        w.into_string().unwrap(),
        "<a t=\"x&quot;y\">R&amp;D &lt;ltda&gt;</a>"
    );
    assert_eq!(escape_xml("a&b"), "a&amp;b");
}

#[test]
fn escape_covers_all_five_entities() {
    assert_eq!(escape_xml(r#"<&>"'"#), "&lt;&amp;&gt;&quot;&apos;");
    assert_eq!(escape_xml("plain"), "plain");
}

// --- Configuration and errors ---

#[test]
fn config_builder_and_serde_defaults() {
    let config = EmitterConfigBuilder::new()
        .default_modal_version("3.00")
        .max_items(10)
        .build();
    assert_eq!(config.default_modal_version, "3.00");
    assert_eq!(config.max_items, 10);

    let parsed: EmitterConfig = serde_json::from_str(r#"{"max_items": 5}"#).unwrap();
    assert_eq!(parsed.default_modal_version, DEFAULT_MODAL_VERSION);
    assert_eq!(parsed.max_items, 5);
    assert_eq!(EmitterConfig::default().max_items, MAX_NFE_ITEMS);
}

#[test]
fn error_classification() {
    let err: DfeError = ValidationError::new("emit.CNPJ", "must contain only digits").into();
    assert_eq!(err.class(), ErrorClass::BadInput);
    assert_eq!(err.field(), Some("emit.CNPJ"));
    assert_eq!(
        err.to_string(),
        "validation failed: emit.CNPJ: must contain only digits"
    );
    assert_eq!(DfeError::Xml("x".into()).class(), ErrorClass::Internal);
}

#[test]
fn emitter_debug_hides_code_source() {
    let emitter = Emitter::default().with_code_source(FixedCode(1));
    let debug = format!("{emitter:?}");
    assert!(debug.starts_with("Emitter { config: EmitterConfig"));
}
