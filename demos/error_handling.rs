use dfe::cte::CtePayload;
use dfe::nfe::NfePayload;
use dfe::{DfeError, Emitter};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

/// A JSON edit applied to a valid fixture.
type Edit = fn(&mut Value);

fn nfe_fixture() -> Value {
    serde_json::from_str(include_str!("../tests/fixtures/nfe_payload.json")).expect("valid JSON")
}

fn cte_fixture() -> Value {
    serde_json::from_str(include_str!("../tests/fixtures/cte_payload.json")).expect("valid JSON")
}

fn report(label: &str, result: Result<String, DfeError>) {
    match result {
        Ok(key) => println!("  {label}: authorized {key}"),
        Err(e) => println!(
            "  {label}: HTTP {} field={:?} -> {e}",
            e.status_code(),
            e.field()
        ),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let emitter = Emitter::default();

    // ── 1. NF-e validation errors ─────────────────────────────────────
    println!("=== NF-e ===");
    let cases: [(&str, Edit); 5] = [
        ("no items", |v: &mut Value| v["items"] = json!([])),
        ("CNPJ with a letter", |v: &mut Value| v["emit"]["CNPJ"] = json!("1234567800019A")),
        ("missing CEP", |v: &mut Value| {
            v["dest"]["enderDest"]["CEP"] = json!("");
        }),
        ("bad dhEmi", |v: &mut Value| v["ide"]["dhEmi"] = json!("amanha")),
        ("bad amount", |v: &mut Value| v["items"][0]["prod"]["vProd"] = json!("cem")),
    ];
    for (label, edit) in cases {
        let mut value = nfe_fixture();
        edit(&mut value);
        let payload: NfePayload = serde_json::from_value(value).expect("shape is valid");
        report(label, emitter.emit_nfe(&payload).map(|a| a.nfe_key));
    }

    // ── 2. CT-e structural errors ─────────────────────────────────────
    println!("\n=== CT-e ===");
    let cases: [(&str, Edit); 4] = [
        ("two modal blocks", |v: &mut Value| {
            v["infModal"]["rodo"] = json!({"RNTRC": "12345678"});
        }),
        ("modal mismatch", |v: &mut Value| v["ide"]["modal"] = json!("04")),
        ("toma 4 without toma3", |v: &mut Value| v["toma"] = json!({"toma": "4"})),
        ("toma3 with toma 1", |v: &mut Value| {
            v["toma"] = json!({"toma": "1", "toma3": {"CNPJ": "11222333000181", "xNome": "X"}});
        }),
    ];
    for (label, edit) in cases {
        let mut value = cte_fixture();
        edit(&mut value);
        let payload: CtePayload = serde_json::from_value(value).expect("shape is valid");
        report(label, emitter.emit_cte(&payload).map(|a| a.cte_key));
    }
}
