//! Signing-key storage for the dev store.
//!
//! A production deployment loads keys from a secret manager; the CLI
//! keeps a hex-encoded 32-byte key next to the store so repeated
//! invocations can decode each other's tokens.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rand::RngCore;

use gleaner_engine::{SigningKey, SigningKeys};

const KEY_LEN: usize = 32;

/// Load the store's signing key, creating one on first use.
pub fn load_or_create(store_root: &Path) -> Result<SigningKeys> {
    let path = store_root.join("store").join("signing.key");

    let bytes = if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read key file {}", path.display()))?;
        hex::decode(content.trim())
            .with_context(|| format!("Key file {} is not valid hex", path.display()))?
    } else {
        let mut bytes = vec![0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, hex::encode(&bytes))
            .with_context(|| format!("Failed to write key file {}", path.display()))?;
        bytes
    };

    Ok(SigningKeys::new(SigningKey::new(bytes)))
}
