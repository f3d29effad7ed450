#![cfg(feature = "cte")]

use chrono::{DateTime, TimeZone, Utc};
use dfe::cte::{self, CtePayload, ModalBlock, PayerRole};
use dfe::{AccessKey, DfeError, Emitter, EmitterConfigBuilder, FixedCode};
use serde_json::{Value, json};

const FIXTURE: &str = include_str!("fixtures/cte_payload.json");
const EXPECTED_KEY: &str = "35250798765432000198570010000004561123456788";

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 10, 13, 0, 0).unwrap()
}

fn emitter() -> Emitter {
    Emitter::default()
        .with_code_source(FixedCode(12_345_678))
        .with_clock(fixed_now)
}

fn fixture() -> Value {
    serde_json::from_str(FIXTURE).unwrap()
}

fn edited(edit: impl FnOnce(&mut Value)) -> CtePayload {
    let mut value = fixture();
    edit(&mut value);
    serde_json::from_value(value).unwrap()
}

fn rejection(payload: &CtePayload) -> (String, String) {
    match emitter().emit_cte(payload) {
        Err(DfeError::Validation(e)) => (e.field, e.message),
        other => panic!("expected a validation error, got {other:?}"),
    }
}

fn road(v: &mut Value) {
    v["ide"]["modal"] = json!("01");
    v["infModal"] = json!({"versaoModal": "4.00", "rodo": {"RNTRC": "12345678"}});
}

fn third_party_payer() -> Value {
    json!({
        "toma": "4",
        "toma3": {
            "CNPJ": "11222333000181",
            "IE": "ISENTO",
            "xNome": "Distribuidora Exemplo",
            "enderToma": {
                "xLgr": "Rua C", "nro": "3", "xBairro": "Industrial",
                "cMun": "3509502", "xMun": "Campinas", "UF": "SP",
                "cPais": "1058", "xPais": "Brasil"
            }
        }
    })
}

// --- Emission ---

#[test]
fn emits_fixture() {
    let auth = emitter().emit_cte(&edited(|_| {})).unwrap();

    assert_eq!(auth.cte_key, EXPECTED_KEY);
    assert!(AccessKey::verify(&auth.cte_key));
    assert_eq!(auth.access_key_components.numeric_code, "12345678");
    assert_eq!(auth.access_key_components.check_digit, "8");

    let xml = &auth.xml;
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.contains(r#"<CTe xmlns="http://www.portalfiscal.inf.br/cte">"#));
    assert!(xml.contains(&format!(r#"<infCte Id="CTe{EXPECTED_KEY}" versao="4.00">"#)));
    assert!(xml.contains("<cCT>12345678</cCT>"));
    assert!(xml.contains("<cDV>8</cDV>"));
    assert!(xml.contains("<nCT>000000456</nCT>"));
    assert!(xml.ends_with("</infCte></CTe>"));
}

#[test]
fn air_modal_block() {
    let xml = emitter().emit_cte(&edited(|_| {})).unwrap().xml;

    assert!(xml.contains(
        "<infModal versaoModal=\"5.00\"><aereo><nMinu>123456789</nMinu>\
         <dPrevAereo>2025-07-11</dPrevAereo><natCarga><xDime>1234X1234X1234</xDime></natCarga>\
         <tarifa><CL>G</CL><vTar>10.00</vTar></tarifa></aereo></infModal>"
    ));
    assert!(!xml.contains("<rodo>"));
}

#[test]
fn modal_block_root_carries_attributes() {
    let p = edited(|v| v["infModal"]["aereo"]["_attributes"] = json!({"versao": "1.00"}));
    let xml = emitter().emit_cte(&p).unwrap().xml;
    assert!(xml.contains(r#"<aereo versao="1.00"><nMinu>123456789</nMinu>"#));
    assert!(!xml.contains("_attributes"));
}

#[test]
fn road_modal_renders_rntrc_only() {
    let p = edited(|v| {
        road(v);
        v["infModal"]["rodo"]["extra"] = json!("ignored");
    });
    let xml = emitter().emit_cte(&p).unwrap().xml;
    assert!(xml.contains(
        r#"<infModal versaoModal="4.00"><rodo><RNTRC>12345678</RNTRC></rodo></infModal>"#
    ));
    assert!(!xml.contains("<aereo>"));
}

#[test]
fn modal_version_falls_back_to_config() {
    let p = edited(|v| {
        v["infModal"].as_object_mut().unwrap().remove("versaoModal");
    });
    let xml = emitter().emit_cte(&p).unwrap().xml;
    assert!(xml.contains(r#"<infModal versaoModal="4.00">"#));

    let custom = Emitter::new(EmitterConfigBuilder::new().default_modal_version("3.00").build())
        .with_code_source(FixedCode(1));
    let xml = custom.emit_cte(&p).unwrap().xml;
    assert!(xml.contains(r#"<infModal versaoModal="3.00">"#));
}

#[test]
fn payer_role_rendering() {
    let xml = emitter().emit_cte(&edited(|_| {})).unwrap().xml;
    assert!(xml.contains("<toma><toma>0</toma></toma>"));

    let p = edited(|v| v["toma"] = third_party_payer());
    let xml = emitter().emit_cte(&p).unwrap().xml;
    assert!(xml.contains(
        "<toma><toma>4</toma><toma3><CNPJ>11222333000181</CNPJ><IE>ISENTO</IE>\
         <xNome>Distribuidora Exemplo</xNome><enderToma><xLgr>Rua C</xLgr>"
    ));
    assert!(xml.contains("</enderToma></toma3></toma>"));
}

#[test]
fn service_cargo_and_taxes() {
    let xml = emitter().emit_cte(&edited(|_| {})).unwrap().xml;

    assert!(xml.contains(
        "<vPrest><vTPrest>250.00</vTPrest><vRec>250.00</vRec>\
         <comp><xNome>FRETE PESO</xNome><vComp>200.00</vComp></comp>\
         <comp><xNome>TAXA TERMINAL</xNome><vComp>50.00</vComp></comp></vPrest>"
    ));
    assert!(xml.contains("<imp><ICMS><ICMS00><CST>00</CST>"));
    assert!(xml.contains("<vCarga>1500.00</vCarga><proPred>MATERIAL DE ESCRITORIO</proPred>"));
    assert!(xml.contains("<infQ><cUnid>01</cUnid><tpMed>PESO BRUTO</tpMed><qCarga>12.500</qCarga></infQ>"));
}

#[test]
fn parties_and_complement() {
    let xml = emitter().emit_cte(&edited(|_| {})).unwrap().xml;

    assert!(xml.contains("<compl><xObs>Carga fragil</xObs></compl>"));
    assert!(xml.contains("<emit><CNPJ>98765432000198</CNPJ><IE>111222333444</IE>"));
    assert!(xml.contains("<rem><CNPJ>12345678000195</CNPJ><IE>123456789012</IE>"));
    assert!(xml.contains("<enderReme><xLgr>Rua das Flores</xLgr>"));
    assert!(xml.contains("<dest><CPF>12345678909</CPF><xNome>Maria da Silva</xNome><enderDest>"));
}

#[test]
fn section_order() {
    let p = edited(|v| {
        v["autXML"] = json!([{"CPF": "12345678909"}]);
        v["prot"] = json!({"infRespTec": {
            "CNPJ": "98765432000198", "xContato": "Suporte", "email": "ti@example.com"
        }});
    });
    let xml = emitter().emit_cte(&p).unwrap().xml;
    let order = [
        "<ide>", "<compl>", "<emit>", "<rem>", "<dest>", "<toma>", "<vPrest>", "<imp>",
        "<infCarga>", "<infModal ", "<autXML>", "<infRespTec>",
    ];
    let positions: Vec<usize> = order.iter().map(|tag| xml.find(tag).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    assert!(xml.contains("<autXML><CPF>12345678909</CPF></autXML>"));
}

#[test]
fn authorization_json_shape() {
    let auth = emitter().emit_cte(&edited(|_| {})).unwrap();
    let json = serde_json::to_value(&auth).unwrap();

    assert_eq!(json["status"], "authorized");
    assert_eq!(json["cteKey"], EXPECTED_KEY);
    assert_eq!(json["issuedAt"], "2025-07-10T13:00:00.000Z");
    assert_eq!(json["accessKeyComponents"]["cCT"], "12345678");
    assert_eq!(json["accessKeyComponents"]["digitoVerificador"], "8");
}

#[test]
fn emission_is_deterministic_with_fixed_inputs() {
    let p = edited(|_| {});
    assert_eq!(emitter().emit_cte(&p).unwrap(), emitter().emit_cte(&p).unwrap());
}

#[test]
fn free_function_uses_random_codes() {
    let auth = cte::emit_cte(&edited(|_| {})).unwrap();
    assert!(AccessKey::verify(&auth.cte_key));
    assert_eq!(&auth.cte_key[35..43], auth.access_key_components.numeric_code);
}

// --- Validation ---

#[test]
fn validated_view_exposes_payer_and_modal() {
    let p = edited(|_| {});
    let doc = cte::validate_cte(&p).unwrap();
    assert_eq!(doc.payer, PayerRole::Sender);
    assert!(matches!(doc.modal, ModalBlock::Air(_)));
    assert_eq!(doc.modal.tag(), "aereo");
}

#[test]
fn rejects_two_modal_blocks() {
    let p = edited(|v| v["infModal"]["rodo"] = json!({"RNTRC": "12345678"}));
    let (field, message) = rejection(&p);
    assert_eq!(field, "infModal");
    assert!(message.ends_with("found rodo, aereo"), "{message}");
}

#[test]
fn rejects_block_of_another_modal() {
    let p = edited(|v| v["ide"]["modal"] = json!("01"));
    assert_eq!(
        rejection(&p),
        ("infModal.rodo".into(), "is required for modal rodo".into())
    );
}

#[test]
fn rejects_unknown_modal_code() {
    let p = edited(|v| v["ide"]["modal"] = json!("10"));
    let (field, message) = rejection(&p);
    assert_eq!(field, "ide.modal");
    assert!(message.starts_with("unknown modal code"), "{message}");
}

#[test]
fn rejects_road_without_rntrc() {
    let p = edited(|v| {
        road(v);
        v["infModal"]["rodo"] = json!({});
    });
    assert_eq!(rejection(&p).0, "infModal.rodo.RNTRC");
}

#[test]
fn rejects_other_payer_without_toma3() {
    let p = edited(|v| v["toma"] = json!({"toma": 4}));
    assert_eq!(
        rejection(&p),
        ("toma.toma3".into(), "is required when toma is 4".into())
    );
}

#[test]
fn rejects_toma3_for_fixed_role() {
    let p = edited(|v| {
        let mut toma = third_party_payer();
        toma["toma"] = json!("1");
        v["toma"] = toma;
    });
    assert_eq!(
        rejection(&p),
        ("toma.toma3".into(), "is only allowed when toma is 4".into())
    );
}

#[test]
fn rejects_bad_toma3_identifier() {
    let p = edited(|v| {
        let mut toma = third_party_payer();
        toma["toma3"]["CNPJ"] = json!("11.222.333/0001-8X");
        v["toma"] = toma;
    });
    assert_eq!(rejection(&p).0, "toma.toma3.CNPJ");
}

#[test]
fn rejects_missing_sections() {
    for (section, field) in [
        ("ide", "ide"),
        ("emit", "emit"),
        ("rem", "rem"),
        ("dest", "dest"),
        ("toma", "toma"),
        ("vPrest", "vPrest"),
        ("imp", "imp"),
        ("infCarga", "infCarga"),
        ("infModal", "infModal"),
    ] {
        let p = edited(|v| {
            v.as_object_mut().unwrap().remove(section);
        });
        assert_eq!(rejection(&p).0, field);
    }
}

#[test]
fn rejects_empty_components_and_quantities() {
    let p = edited(|v| v["vPrest"]["component"] = json!([]));
    assert_eq!(rejection(&p).0, "vPrest.component");

    let p = edited(|v| v["infCarga"]["infQ"] = json!([]));
    assert_eq!(rejection(&p).0, "infCarga.infQ");
}

#[test]
fn postal_code_is_optional() {
    let p = edited(|v| {
        v["emit"]["enderEmit"].as_object_mut().unwrap().remove("CEP");
    });
    let xml = emitter().emit_cte(&p).unwrap().xml;
    assert!(!xml.contains("<CEP>07190100</CEP>"));
}

#[test]
fn rejects_incomplete_address() {
    let p = edited(|v| {
        v["rem"]["enderReme"].as_object_mut().unwrap().remove("xBairro");
    });
    assert_eq!(rejection(&p).0, "rem.enderReme.xBairro");
}

#[test]
fn rejects_authorized_viewer_without_id() {
    let p = edited(|v| v["autXML"] = json!([{"CNPJ": "98765432000198"}, {}]));
    assert_eq!(
        rejection(&p),
        ("autXML[1]".into(), "CNPJ or CPF is required".into())
    );
}

#[test]
fn rejects_bad_cte_number() {
    let p = edited(|v| v["ide"]["nCT"] = json!("12A"));
    assert_eq!(
        rejection(&p),
        ("ide.nCT".into(), "must contain only digits".into())
    );
}
