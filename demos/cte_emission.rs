use dfe::cte::{self, CtePayload};
use dfe::{Emitter, FixedCode, generate_access_key};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let payload: CtePayload =
        serde_json::from_str(include_str!("../tests/fixtures/cte_payload.json"))
            .expect("fixture is valid JSON");

    // ── 1. Step by step: validate, key, encode ────────────────────────
    println!("=== Step by step ===");
    let doc = cte::validate_cte(&payload).expect("fixture is a valid CT-e");
    println!("  Payer role: {} ({:?})", doc.payer.code(), doc.payer);
    println!("  Modal:      {} -> <{}>", doc.ide.modal, doc.modal.tag());

    let key = generate_access_key(&doc.key_fields(), &FixedCode(20_250_710))
        .expect("key fields were validated");
    println!("  Key:        {key}");
    println!("  AAMM:       {}", key.year_month());

    let xml = cte::to_cte_xml(&doc, &key).expect("encodable");
    println!("  XML size:   {} bytes", xml.len());

    // ── 2. One call through the emitter ───────────────────────────────
    println!("\n=== Emitter ===");
    let auth = Emitter::default()
        .with_code_source(FixedCode(20_250_710))
        .emit_cte(&payload)
        .expect("fixture is a valid CT-e");
    println!("  Key:        {}", auth.cte_key);
    println!("  Same XML:   {}", auth.xml == xml);

    println!("\n=== XML ===");
    println!("{}", auth.xml);
}
