use taskwise::error::TaskwiseError;
use taskwise::processors::{ProcessorKind, REGISTRY};

#[test]
fn test_location_is_us_for_every_entry() {
    assert_eq!(REGISTRY.location(), "us");
    for kind in ProcessorKind::ALL {
        assert_eq!(REGISTRY.describe(kind, None).location, "us");
    }
}

#[test]
fn test_known_keys_resolve_to_literals() {
    let expected = [
        ("ocr", "OCR_PROCESSOR_ID"),
        ("layout", "LAYOUT_PARSER_PROCESSOR_ID"),
        ("form", "FORM_PARSER_PROCESSOR_ID"),
        ("invoice", "INVOICE_PARSER_PROCESSOR_ID"),
        ("expense", "EXPENSE_PARSER_PROCESSOR_ID"),
        ("bankStatement", "BANK_STATEMENT_PARSER_PROCESSOR_ID"),
    ];

    for (key, id) in expected {
        assert_eq!(REGISTRY.lookup(key).unwrap(), id, "key {}", key);
    }

    let keys: Vec<&str> = REGISTRY.entries().map(|(k, _)| k.key()).collect();
    let expected_keys: Vec<&str> = expected.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, expected_keys);
}

#[test]
fn test_unknown_key_is_rejected() {
    for key in ["receipt", "", "bank_statement", "ocr2", "OCR", " ocr ", "Invoice"] {
        match REGISTRY.lookup(key) {
            Err(TaskwiseError::UnknownProcessorKey { key: got, known }) => {
                assert_eq!(got, key);
                assert!(known.contains("bankStatement"));
            }
            other => panic!("expected UnknownProcessorKey for {:?}, got {:?}", key, other),
        }
    }
}

#[test]
fn test_resource_name_and_process_url() {
    assert_eq!(
        REGISTRY.resource_name(ProcessorKind::Form, "acme-prod"),
        "projects/acme-prod/locations/us/processors/FORM_PARSER_PROCESSOR_ID"
    );
    assert_eq!(
        REGISTRY.process_url(ProcessorKind::Ocr, "acme-prod"),
        "https://us-documentai.googleapis.com/v1/projects/acme-prod/locations/us/processors/OCR_PROCESSOR_ID:process"
    );
}

#[test]
fn test_describe_serializes_camel_case() {
    let entry = REGISTRY.describe(ProcessorKind::BankStatement, Some("acme-prod"));
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["key"], "bankStatement");
    assert_eq!(json["processorId"], "BANK_STATEMENT_PARSER_PROCESSOR_ID");
    assert_eq!(
        json["resourceName"],
        "projects/acme-prod/locations/us/processors/BANK_STATEMENT_PARSER_PROCESSOR_ID"
    );
}

#[test]
fn test_registry_shared_across_threads() {
    let handles: Vec<_> = ProcessorKind::ALL
        .into_iter()
        .map(|kind| std::thread::spawn(move || REGISTRY.get(kind)))
        .collect();
    let ids: Vec<&str> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(ids.len(), 6);
    assert!(ids.iter().all(|id| id.ends_with("PROCESSOR_ID")));
}
