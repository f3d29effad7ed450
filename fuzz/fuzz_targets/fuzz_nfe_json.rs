#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must not panic: errors are fine, panics are bugs.
    if let Ok(payload) = serde_json::from_slice::<dfe::nfe::NfePayload>(data) {
        if let Ok(auth) = dfe::nfe::emit_nfe(&payload) {
            assert!(dfe::AccessKey::verify(&auth.nfe_key));
        }
    }
});
