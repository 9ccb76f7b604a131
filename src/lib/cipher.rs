//! The capability boundary between the sync core and an actual
//! encryption backend.
//!
//! The core never implements cryptography; it drives a [`Cipher`] supplied by
//! the caller. The bundled backend is AWS KMS, available behind the `aws`
//! feature as [`aws::AwsKms`].

use async_trait::async_trait;

use crate::map::map_values;
use crate::parse::EnvMap;

#[cfg(feature = "aws")]
pub mod aws;

/// An injected encrypt/decrypt capability.
///
/// A cipher is constructed once with whatever addressing it needs (key id,
/// region). Each call additionally receives the environment variable name,
/// which a backend may use as binding context so a ciphertext cannot be
/// silently moved to a different variable.
///
/// Implementations must fail with an error rather than returning sentinel
/// values: a missing or empty decrypted payload is a
/// [`CipherError::DecryptionFailed`], never an empty string.
#[async_trait]
pub trait Cipher {
  /// Encrypts a plaintext value, returning a payload that is textually safe
  /// to embed in the encrypted env file.
  async fn encrypt(&self, plaintext: &str, key: &str) -> Result<String, CipherError>;

  /// Decrypts a payload previously produced by [`Cipher::encrypt`].
  async fn decrypt(&self, ciphertext: &str, key: &str) -> Result<String, CipherError>;

  /// Backend name for display.
  fn name(&self) -> &'static str;
}

/// Encrypts every value of `values` through `cipher`, in sorted key order.
///
/// Any failure aborts the whole operation with no partial result.
pub async fn encrypt_values<C: Cipher>(
  cipher: &C,
  values: &EnvMap,
) -> Result<EnvMap, CipherError> {
  map_values(values, |key, value| async move {
    cipher.encrypt(&value, &key).await
  })
  .await
}

/// Decrypts every value of `values` through `cipher`, in sorted key order.
///
/// Any failure aborts the whole operation with no partial result.
pub async fn decrypt_values<C: Cipher>(
  cipher: &C,
  values: &EnvMap,
) -> Result<EnvMap, CipherError> {
  map_values(values, |key, value| async move {
    cipher.decrypt(&value, &key).await
  })
  .await
}

#[derive(Debug, thiserror::Error)]
pub enum CipherError {
  #[error("encryption failed: {0}")]
  EncryptionFailed(String),
  #[error("decryption failed: {0}")]
  DecryptionFailed(String),
}
