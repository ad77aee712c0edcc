//! Upload key resolution tests for coriolis-dynaforms.
// crates/coriolis-dynaforms/tests/key_resolution.rs
// =============================================================================
// Module: Key Resolution Tests
// Description: Public key validation and recipient collection for uploads.
// Purpose: Ensure encrypted uploads surface missing or broken keys.
// =============================================================================

use coriolis_dynaforms::DynaformError;
use coriolis_dynaforms::InMemoryKeyStore;
use coriolis_dynaforms::KeyResolutionError;
use coriolis_dynaforms::PublicKey;
use coriolis_dynaforms::PublicKeyKind;
use coriolis_dynaforms::keys::PublicKeyError;
use coriolis_dynaforms::resolve_pubkeys;
use serde_json::json;

mod common;

type TestResult = Result<(), String>;

/// Returns a valid age key record named `name`.
fn age_key(name: &str) -> PublicKey {
    PublicKey {
        name: name.to_string(),
        kind: PublicKeyKind::AgeX25519,
        pubkey: "  age1qyqszqgpqyqszqgpqyqszqgpqyqszqgpqyqszqgpqyqszqgpqyqs3290gq  ".to_string(),
    }
}

/// Returns a store with one valid age key, one valid SSH key and one broken key.
fn store() -> InMemoryKeyStore {
    [
        age_key("org-key-1"),
        PublicKey {
            name: "ops".to_string(),
            kind: PublicKeyKind::SshEd25519,
            pubkey: "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIB ops@coriolis".to_string(),
        },
        PublicKey {
            name: "broken".to_string(),
            kind: PublicKeyKind::SshEd25519,
            pubkey: "ssh-rsa AAAAB3Nza".to_string(),
        },
    ]
    .into_iter()
    .collect()
}

// ============================================================================
// SECTION: Key Records
// ============================================================================

#[test]
fn valid_keys_are_trimmed_into_recipients() -> TestResult {
    let recipient = age_key("org-key-1").validate().map_err(|err| err.to_string())?;
    if !recipient.pubkey.starts_with("age1") || recipient.pubkey.ends_with(' ') {
        return Err(format!("unexpected recipient {recipient:?}"));
    }
    Ok(())
}

#[test]
fn key_prefixes_are_checked_per_kind() -> TestResult {
    let mislabelled = PublicKey {
        kind: PublicKeyKind::SshEd25519,
        ..age_key("k")
    };
    match mislabelled.validate() {
        Err(PublicKeyError::InvalidPrefix {
            prefix, ..
        }) if prefix == "ssh-ed25519 " => Ok(()),
        other => Err(format!("unexpected outcome {other:?}")),
    }
}

#[test]
fn key_names_must_be_simple_identifiers() -> TestResult {
    match age_key("org key").validate() {
        Err(PublicKeyError::InvalidName(name)) if name == "org key" => Ok(()),
        other => Err(format!("unexpected outcome {other:?}")),
    }
}

#[test]
fn key_store_keeps_one_record_per_name() -> TestResult {
    if !InMemoryKeyStore::new().is_empty() {
        return Err("a new store must be empty".to_string());
    }
    let mut store = store();
    if store.len() != 3 || store.is_empty() {
        return Err(format!("expected three stored keys, got {}", store.len()));
    }
    store.insert(age_key("ops"));
    if store.len() != 3 {
        return Err(format!("re-inserting a name must replace it, got {}", store.len()));
    }
    Ok(())
}

#[test]
fn key_kinds_use_kebab_case_wire_names() -> TestResult {
    let value = serde_json::to_value(PublicKeyKind::AgeX25519).map_err(|err| err.to_string())?;
    if value != json!("age-x25519") || PublicKeyKind::SshEd25519.as_str() != "ssh-ed25519" {
        return Err(format!("unexpected wire name {value}"));
    }
    Ok(())
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

#[test]
fn resolution_collects_failures_per_name() -> TestResult {
    let store = store();
    let resolution = resolve_pubkeys(&store, ["ops", "missing", "org-key-1", "ops", "broken"]);
    let names: Vec<&str> =
        resolution.recipients.iter().map(|recipient| recipient.name.as_str()).collect();
    if names != ["ops", "org-key-1"] {
        return Err(format!("recipients must be sorted and unique: {names:?}"));
    }
    let failed: Vec<&str> = resolution.errors.keys().map(String::as_str).collect();
    if failed != ["broken", "missing"] {
        return Err(format!("unexpected failures {failed:?}"));
    }
    if resolution.errors.get("missing") != Some(&KeyResolutionError::NotFound("missing".to_string()))
    {
        return Err("missing key must be reported as not found".to_string());
    }
    if !matches!(resolution.errors.get("broken"), Some(KeyResolutionError::Invalid { .. })) {
        return Err("broken key must be reported as invalid".to_string());
    }
    Ok(())
}

#[test]
fn forms_report_encrypted_uploads_without_recipients() -> TestResult {
    let form = common::build_ok(
        Some("reg"),
        &json!({
            "receipt": {"kind": "file", "label": "Receipt", "upload_prefix": "receipts"},
            "passport": {
                "kind": "file",
                "label": "Passport",
                "upload_prefix": "ids",
                "encrypt": true,
                "pubkeys": ["missing", "broken"]
            },
            "cv": {
                "kind": "file",
                "label": "CV",
                "upload_prefix": "cvs",
                "encrypt": true,
                "required": false,
                "pubkeys": ["missing"]
            },
            "medical": {
                "kind": "file",
                "label": "Medical",
                "upload_prefix": "medical",
                "encrypt": true,
                "pubkeys": ["org-key-1", "missing"]
            }
        }),
    )?;
    let report = form.resolve_upload_recipients(&store());
    let reported: Vec<&str> = report.fields.iter().map(|upload| upload.field.as_str()).collect();
    if reported != ["df__reg__passport", "df__reg__cv", "df__reg__medical"] {
        return Err(format!("only encrypted uploads are reported: {reported:?}"));
    }
    if report.blocking_fields() != ["df__reg__passport"] {
        return Err(format!("unexpected blocking fields {:?}", report.blocking_fields()));
    }
    match report.ensure_submittable() {
        Err(DynaformError::MissingRecipients {
            fields,
        }) if fields == ["df__reg__passport"] => Ok(()),
        other => Err(format!("unexpected outcome {other:?}")),
    }
}

#[test]
fn forms_with_resolvable_keys_are_submittable() -> TestResult {
    let form = common::build_ok(
        None,
        &json!({
            "passport": {
                "kind": "file",
                "label": "Passport",
                "upload_prefix": "ids",
                "encrypt": true,
                "pubkeys": ["org-key-1"]
            }
        }),
    )?;
    form.resolve_upload_recipients(&store()).ensure_submittable().map_err(|err| err.to_string())
}
