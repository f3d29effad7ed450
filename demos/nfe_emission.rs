use dfe::nfe::NfePayload;
use dfe::{Emitter, EmitterConfigBuilder};
use tracing_subscriber::EnvFilter;

fn main() {
    // RUST_LOG=dfe=debug shows validation, key and encoding events
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let payload: NfePayload =
        serde_json::from_str(include_str!("../tests/fixtures/nfe_payload.json"))
            .expect("fixture is valid JSON");

    let emitter = Emitter::new(EmitterConfigBuilder::new().max_items(50).build());
    let auth = emitter.emit_nfe(&payload).expect("fixture is a valid NF-e");

    println!("=== NF-e authorized ===");
    println!("  Key:        {}", auth.nfe_key);
    println!("  cNF:        {}", auth.access_key_components.numeric_code);
    println!("  DV:         {}", auth.access_key_components.check_digit);
    println!("  Issued at:  {}", auth.issued_at);
    println!("  XML size:   {} bytes", auth.xml.len());

    println!("\n=== Response JSON ===");
    let mut json = serde_json::to_value(&auth).expect("serializable");
    json["xml"] = serde_json::Value::String(format!("<{} bytes>", auth.xml.len()));
    println!("{}", serde_json::to_string_pretty(&json).expect("serializable"));

    println!("\n=== XML ===");
    println!("{}", auth.xml);
}
