//! AWS KMS cipher backend.
//!
//! Encrypts values with AWS Key Management Service. Enable with
//! `--features aws`.
//!
//! Credentials come from the default provider chain (environment variables,
//! shared config, instance metadata). The region can be forced per
//! invocation; otherwise the chain's region is used. Each value is encrypted
//! with an encryption context carrying the variable name, so KMS refuses to
//! decrypt a payload that was moved to a different variable.

use async_trait::async_trait;
use aws_sdk_kms::primitives::Blob;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

#[cfg(feature = "tracing")]
use tracing::trace;

use super::{Cipher, CipherError};

const CONTEXT_FIELD: &str = "key";

/// AWS KMS capability.
///
/// KMS embeds the key information in the ciphertext, so only encryption
/// needs the key id; decryption needs matching credentials and context.
pub struct AwsKms {
  key_id: String,
  region: Option<String>,
}

impl AwsKms {
  /// Creates a KMS cipher for the given key id or ARN, optionally pinned to
  /// a region.
  pub fn new(key_id: String, region: Option<String>) -> Self {
    Self { key_id, region }
  }

  async fn client(&self) -> aws_sdk_kms::Client {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = &self.region {
      loader = loader.region(aws_config::Region::new(region.clone()));
    }
    let config = loader.load().await;
    aws_sdk_kms::Client::new(&config)
  }
}

#[async_trait]
impl Cipher for AwsKms {
  async fn encrypt(&self, plaintext: &str, key: &str) -> Result<String, CipherError> {
    #[cfg(feature = "tracing")]
    trace!(key_id = %self.key_id, key, "encrypting with AWS KMS");

    let result = self
      .client()
      .await
      .encrypt()
      .key_id(&self.key_id)
      .plaintext(Blob::new(plaintext.as_bytes()))
      .encryption_context(CONTEXT_FIELD, key)
      .send()
      .await
      .map_err(|e| CipherError::EncryptionFailed(format!("KMS encrypt failed for {}: {}", key, e)))?;

    let blob = result
      .ciphertext_blob()
      .ok_or_else(|| CipherError::EncryptionFailed(format!("no ciphertext returned for {}", key)))?;

    Ok(BASE64.encode(blob.as_ref()))
  }

  async fn decrypt(&self, ciphertext: &str, key: &str) -> Result<String, CipherError> {
    #[cfg(feature = "tracing")]
    trace!(key, ciphertext_len = ciphertext.len(), "decrypting with AWS KMS");

    let blob = BASE64
      .decode(ciphertext)
      .map_err(|e| CipherError::DecryptionFailed(format!("invalid base64 for {}: {}", key, e)))?;

    let result = self
      .client()
      .await
      .decrypt()
      .ciphertext_blob(Blob::new(blob))
      .encryption_context(CONTEXT_FIELD, key)
      .send()
      .await
      .map_err(|e| CipherError::DecryptionFailed(format!("KMS decrypt failed for {}: {}", key, e)))?;

    let plaintext = result
      .plaintext()
      .ok_or_else(|| CipherError::DecryptionFailed(format!("no plaintext returned for {}", key)))?;

    String::from_utf8(plaintext.as_ref().to_vec())
      .map_err(|e| CipherError::DecryptionFailed(format!("non-UTF-8 plaintext for {}: {}", key, e)))
  }

  fn name(&self) -> &'static str {
    "aws-kms"
  }
}
