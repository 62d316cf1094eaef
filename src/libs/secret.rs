//! Encrypted on-disk storage for the Worksnaps API token.
//!
//! The token never goes into `config.json`. It is encrypted with AES-256-CBC
//! using the key material embedded by `build.rs` and stored base64-encoded in
//! its own file inside the data directory.

use super::metadata::{APP_METADATA_ENCRYPTION_IV, APP_METADATA_ENCRYPTION_KEY};
use aes::Aes256;
use anyhow::Result;
use base64::prelude::*;
use block_modes::block_padding::Pkcs7;
use block_modes::{BlockMode, Cbc};
use dialoguer::{theme::ColorfulTheme, Password};
use std::fs;
use std::path::PathBuf;

type Aes256Cbc = Cbc<Aes256, Pkcs7>;

#[derive(Clone, Debug)]
pub struct Secret {
    prompt: String,
    secret_file_path: PathBuf,
}

impl Secret {
    pub fn at(secret_file_path: impl Into<PathBuf>, prompt: &str) -> Self {
        Self {
            secret_file_path: secret_file_path.into(),
            prompt: prompt.to_owned(),
        }
    }

    /// Returns the stored secret, or `None` when nothing has been stored yet.
    pub fn get(&self) -> Result<Option<String>> {
        if !self.secret_file_path.exists() {
            return Ok(None);
        }
        self.decrypt().map(Some)
    }

    /// Asks for the secret with a hidden prompt and stores it.
    pub fn prompt(&self) -> Result<String> {
        let value = Password::with_theme(&ColorfulTheme::default())
            .with_prompt(&self.prompt)
            .allow_empty_password(false)
            .interact()?;
        self.store(&value)?;
        Ok(value)
    }

    pub fn store(&self, value: &str) -> Result<()> {
        let cipher = Aes256Cbc::new_from_slices(APP_METADATA_ENCRYPTION_KEY, APP_METADATA_ENCRYPTION_IV)?;
        let ciphertext = cipher.encrypt_vec(value.as_bytes());

        if let Some(parent) = self.secret_file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.secret_file_path, BASE64_STANDARD.encode(ciphertext))?;
        Ok(())
    }

    /// Removes the stored secret. A missing file is not an error.
    pub fn delete(&self) -> Result<()> {
        if self.secret_file_path.exists() {
            fs::remove_file(&self.secret_file_path)?;
        }
        Ok(())
    }

    fn decrypt(&self) -> Result<String> {
        let encoded = fs::read_to_string(&self.secret_file_path)?;
        let ciphertext = BASE64_STANDARD.decode(encoded.trim())?;
        let cipher = Aes256Cbc::new_from_slices(APP_METADATA_ENCRYPTION_KEY, APP_METADATA_ENCRYPTION_IV)?;
        let plaintext = cipher.decrypt_vec(&ciphertext)?;
        Ok(String::from_utf8(plaintext)?)
    }
}
