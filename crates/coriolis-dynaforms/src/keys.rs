// crates/coriolis-dynaforms/src/keys.rs
// ============================================================================
// Module: Upload Key Resolution
// Description: Public key records and recipient lookup for encrypted uploads.
// Purpose: Resolve `pubkeys` names through a caller-provided key store.
// Dependencies: crate::{dynaform, schema}, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! Encrypted file fields name the public keys their uploads are sealed to.
//! The names are resolved through a [`KeyResolver`] supplied by the caller.
//! Resolution never fails as a whole: every name is tried and the failures
//! are collected next to the recipients that did resolve. Whether a form can
//! be submitted is decided afterwards by [`UploadKeyReport::ensure_submittable`].
//!
//! ## Invariants
//! - Key names are de-duplicated and processed in sorted order.
//! - A required encrypted upload with zero recipients blocks submission.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::dynaform::DynaformError;
use crate::schema::SIMPLE_IDENTIFIER_PATTERN;
use crate::schema::is_simple_identifier;

// ============================================================================
// SECTION: Public Keys
// ============================================================================

/// Prefix of an age X25519 recipient.
const AGE_KEY_PREFIX: &str = "age1";
/// Prefix of an OpenSSH Ed25519 public key line.
const SSH_ED25519_PREFIX: &str = "ssh-ed25519 ";

/// Public key algorithm accepted for upload encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicKeyKind {
    /// age native X25519 recipient.
    AgeX25519,
    /// OpenSSH Ed25519 public key.
    SshEd25519,
}

impl PublicKeyKind {
    /// Returns the wire name of the key kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AgeX25519 => "age-x25519",
            Self::SshEd25519 => "ssh-ed25519",
        }
    }

    /// Returns the prefix a key of this kind must start with.
    const fn required_prefix(self) -> &'static str {
        match self {
            Self::AgeX25519 => AGE_KEY_PREFIX,
            Self::SshEd25519 => SSH_ED25519_PREFIX,
        }
    }
}

/// Public key record as kept by a key store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// Identifier referenced from `pubkeys`.
    pub name: String,
    /// Key algorithm.
    pub kind: PublicKeyKind,
    /// Encoded public key.
    pub pubkey: String,
}

/// Public key record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublicKeyError {
    /// Key name is not a simple identifier.
    #[error("key name `{0}` must match {pattern}", pattern = SIMPLE_IDENTIFIER_PATTERN)]
    InvalidName(String),
    /// Encoded key does not start with the prefix of its kind.
    #[error("{algorithm} key must start with `{prefix}`", algorithm = .kind.as_str())]
    InvalidPrefix {
        /// Declared algorithm.
        kind: PublicKeyKind,
        /// Expected prefix.
        prefix: &'static str,
    },
}

impl PublicKey {
    /// Validates the record and returns it with the key trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`PublicKeyError`] when the name or encoded key is malformed.
    pub fn validate(&self) -> Result<Recipient, PublicKeyError> {
        if !is_simple_identifier(&self.name) {
            return Err(PublicKeyError::InvalidName(self.name.clone()));
        }
        let pubkey = self.pubkey.trim();
        let prefix = self.kind.required_prefix();
        if !pubkey.starts_with(prefix) {
            return Err(PublicKeyError::InvalidPrefix {
                kind: self.kind,
                prefix,
            });
        }
        Ok(Recipient {
            name: self.name.clone(),
            kind: self.kind,
            pubkey: pubkey.to_string(),
        })
    }
}

/// Validated key an upload can be encrypted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    /// Key name.
    pub name: String,
    /// Key algorithm.
    pub kind: PublicKeyKind,
    /// Trimmed encoded key.
    pub pubkey: String,
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Lookup of a single key name failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyResolutionError {
    /// No key with the name exists.
    #[error("public key `{0}` not found")]
    NotFound(String),
    /// The stored key is malformed.
    #[error("public key `{name}` is invalid: {source}")]
    Invalid {
        /// Key name.
        name: String,
        /// Validation failure.
        source: PublicKeyError,
    },
}

/// Resolves public key names to recipients.
pub trait KeyResolver {
    /// Resolves one key name.
    ///
    /// # Errors
    ///
    /// Returns [`KeyResolutionError`] when the key is missing or malformed.
    fn resolve_key(&self, name: &str) -> Result<Recipient, KeyResolutionError>;
}

/// Key store held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyStore {
    /// Stored keys.
    keys: BTreeMap<String, PublicKey>,
}

impl InMemoryKeyStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    /// Stores `key` under its name, replacing any previous entry.
    ///
    /// Keys are validated when resolved, not when stored.
    pub fn insert(&mut self, key: PublicKey) {
        self.keys.insert(key.name.clone(), key);
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true when no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<PublicKey> for InMemoryKeyStore {
    fn from_iter<T: IntoIterator<Item = PublicKey>>(iter: T) -> Self {
        let mut store = Self::new();
        for key in iter {
            store.insert(key);
        }
        store
    }
}

impl KeyResolver for InMemoryKeyStore {
    fn resolve_key(&self, name: &str) -> Result<Recipient, KeyResolutionError> {
        let key = self.keys.get(name).ok_or_else(|| KeyResolutionError::NotFound(name.to_string()))?;
        key.validate().map_err(|source| KeyResolutionError::Invalid {
            name: name.to_string(),
            source,
        })
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Outcome of resolving a list of key names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyResolution {
    /// Resolved recipients in name order.
    pub recipients: Vec<Recipient>,
    /// Failures keyed by key name.
    pub errors: BTreeMap<String, KeyResolutionError>,
}

/// Resolves every distinct name in `names` through `resolver`.
///
/// Failures are logged and collected; they never abort resolution.
#[must_use]
pub fn resolve_pubkeys<I, S>(resolver: &dyn KeyResolver, names: I) -> KeyResolution
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let unique: BTreeSet<String> = names.into_iter().map(|name| name.as_ref().to_string()).collect();
    let mut resolution = KeyResolution::default();
    for name in unique {
        match resolver.resolve_key(&name) {
            Ok(recipient) => resolution.recipients.push(recipient),
            Err(err) => {
                warn!(key = %name, error = %err, "public key resolution failed");
                resolution.errors.insert(name, err);
            }
        }
    }
    resolution
}

/// Key resolution outcome for one encrypted upload field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecipients {
    /// Prefixed field name.
    pub field: String,
    /// Whether the field requires an answer.
    pub required: bool,
    /// Resolution of the field's `pubkeys`.
    pub resolution: KeyResolution,
}

/// Key resolution outcome for every encrypted upload of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadKeyReport {
    /// Per-field outcomes in declaration order.
    pub fields: Vec<UploadRecipients>,
}

impl UploadKeyReport {
    /// Returns the prefixed names of required uploads without any recipient.
    #[must_use]
    pub fn blocking_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|upload| upload.required && upload.resolution.recipients.is_empty())
            .map(|upload| upload.field.as_str())
            .collect()
    }

    /// Checks that every required encrypted upload has a recipient.
    ///
    /// # Errors
    ///
    /// Returns [`DynaformError::MissingRecipients`] naming each blocking field.
    pub fn ensure_submittable(&self) -> Result<(), DynaformError> {
        let blocking = self.blocking_fields();
        if blocking.is_empty() {
            return Ok(());
        }
        Err(DynaformError::MissingRecipients {
            fields: blocking.into_iter().map(str::to_string).collect(),
        })
    }
}
