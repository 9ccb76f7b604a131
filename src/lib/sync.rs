//! Synchronization between the plaintext and encrypted env files.
//!
//! # Encrypt flow
//!
//! 1. Read and parse the plaintext file (fatal if missing)
//! 2. Read the existing encrypted file; if it does not exist, the prior
//!    snapshot is empty and a new file will be created
//! 3. Decrypt the prior snapshot and diff it against the new plaintext
//! 4. No differences: done, the encrypted file is not touched
//! 5. Otherwise re-encrypt the *entire* new value set and rewrite the
//!    encrypted file; partial ciphertext updates are never performed
//!
//! A decrypt or parse failure on an existing encrypted file is fatal —
//! unlike a missing file, it means the file is corrupt or the key/region is
//! wrong, and continuing would re-encrypt over evidence of the problem.
//!
//! # Decrypt flow
//!
//! Read and parse the encrypted file (fatal if missing), decrypt every
//! value, and overwrite the plaintext file. No diffing on this path.
//!
//! Writes are whole-file replacements without an atomic rename; a crash
//! mid-write can leave a truncated file. Concurrent invocations against the
//! same file pair are not synchronized.

use std::io;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::{debug, info};

use crate::cipher::{Cipher, CipherError, decrypt_values, encrypt_values};
use crate::diff::EnvDiff;
use crate::parse::{EnvMap, ParseError, parse};
use crate::render::render;

const DEFAULT_PLAINTEXT_FILENAME: &str = ".env";
const DEFAULT_ENCRYPTED_FILENAME: &str = ".env.encrypted";

/// Synchronizes an env file pair through an injected cipher.
pub struct EnvCrypt<C> {
  cipher: C,
  plaintext_path: PathBuf,
  encrypted_path: PathBuf,
}

/// Configuration options for the file pair.
#[derive(Default)]
pub struct EnvCryptOptions {
  /// Path to the plaintext env file. If None, defaults to `.env` in the
  /// current directory.
  pub plaintext_file: Option<PathBuf>,
  /// Path to the encrypted env file. If None, defaults to `.env.encrypted`
  /// in the current directory.
  pub encrypted_file: Option<PathBuf>,
}

/// What an encrypt run did.
#[derive(Debug, PartialEq, Eq)]
pub enum SyncOutcome {
  /// The decrypted prior snapshot already matched the plaintext; the
  /// encrypted file was not touched.
  Unchanged,
  /// Differences were found and the encrypted file was rewritten.
  Written(EnvDiff),
}

impl<C: Cipher> EnvCrypt<C> {
  /// Creates a synchronizer from a cipher and file-pair options.
  pub fn new(cipher: C, options: EnvCryptOptions) -> Self {
    let EnvCryptOptions {
      plaintext_file,
      encrypted_file,
    } = options;

    Self {
      cipher,
      plaintext_path: plaintext_file.unwrap_or_else(|| default_path(DEFAULT_PLAINTEXT_FILENAME)),
      encrypted_path: encrypted_file.unwrap_or_else(|| default_path(DEFAULT_ENCRYPTED_FILENAME)),
    }
  }

  /// The resolved plaintext file path.
  pub fn plaintext_path(&self) -> &Path {
    &self.plaintext_path
  }

  /// The resolved encrypted file path.
  pub fn encrypted_path(&self) -> &Path {
    &self.encrypted_path
  }

  /// Encrypts the plaintext file into the encrypted file, skipping the
  /// rewrite entirely when nothing changed.
  ///
  /// `comment_lines` are prepended verbatim to the encrypted file when it is
  /// written; pass an empty slice for none.
  pub async fn encrypt_and_write(
    &self,
    comment_lines: &[String],
  ) -> Result<SyncOutcome, EnvCryptError> {
    #[cfg(feature = "tracing")]
    info!("Starting encrypt of {:?}", self.plaintext_path);

    let plaintext_raw = match std::fs::read_to_string(&self.plaintext_path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(EnvCryptError::PlaintextNotFound(self.plaintext_path.clone()));
      }
      Err(e) => return Err(EnvCryptError::PlaintextIo(e)),
    };
    let new_values = parse(&plaintext_raw).map_err(EnvCryptError::PlaintextParse)?;

    let old_values = match std::fs::read_to_string(&self.encrypted_path) {
      Ok(raw) => {
        let old_encrypted = parse(&raw).map_err(EnvCryptError::EncryptedParse)?;
        decrypt_values(&self.cipher, &old_encrypted).await?
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        #[cfg(feature = "tracing")]
        info!("Creating encrypted file at {:?}", self.encrypted_path);
        EnvMap::new()
      }
      Err(e) => return Err(EnvCryptError::EncryptedIo(e)),
    };

    let diff = EnvDiff::between(&old_values, &new_values);
    if diff.is_empty() {
      #[cfg(feature = "tracing")]
      info!("No differences, skipping encryption");
      return Ok(SyncOutcome::Unchanged);
    }

    #[cfg(feature = "tracing")]
    debug!(
      changed = diff.changed_keys.len(),
      removed = diff.removed_keys.len(),
      "Re-encrypting all {} values",
      new_values.len()
    );

    let encrypted_values = encrypt_values(&self.cipher, &new_values).await?;
    let content = render(comment_lines, &encrypted_values);
    std::fs::write(&self.encrypted_path, content).map_err(EnvCryptError::Write)?;

    #[cfg(feature = "tracing")]
    info!("Wrote encrypted file {:?}", self.encrypted_path);

    Ok(SyncOutcome::Written(diff))
  }

  /// Decrypts the encrypted file and overwrites the plaintext file.
  pub async fn decrypt_and_write(&self) -> Result<(), EnvCryptError> {
    #[cfg(feature = "tracing")]
    info!("Starting decrypt of {:?}", self.encrypted_path);

    let raw = match std::fs::read_to_string(&self.encrypted_path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(EnvCryptError::EncryptedNotFound(self.encrypted_path.clone()));
      }
      Err(e) => return Err(EnvCryptError::EncryptedIo(e)),
    };
    let encrypted = parse(&raw).map_err(EnvCryptError::EncryptedParse)?;

    let decrypted = decrypt_values(&self.cipher, &encrypted).await?;

    let content = render(&[], &decrypted);
    std::fs::write(&self.plaintext_path, content).map_err(EnvCryptError::Write)?;

    #[cfg(feature = "tracing")]
    info!("Wrote plaintext file {:?}", self.plaintext_path);

    Ok(())
  }
}

fn default_path(filename: &str) -> PathBuf {
  std::env::current_dir()
    .unwrap_or_else(|_| PathBuf::from("."))
    .join(filename)
}

/// Errors that can occur while synchronizing the file pair.
#[derive(Debug, thiserror::Error)]
pub enum EnvCryptError {
  /// The plaintext file required for encryption does not exist
  #[error("Plaintext env file not found: {0} (nothing to encrypt)")]
  PlaintextNotFound(PathBuf),
  /// The encrypted file required for decryption does not exist
  #[error("Encrypted env file not found: {0} (nothing to decrypt)")]
  EncryptedNotFound(PathBuf),
  /// Error reading the plaintext file
  #[error("Plaintext file IO error: {0}")]
  PlaintextIo(std::io::Error),
  /// Error reading the encrypted file
  #[error("Encrypted file IO error: {0}")]
  EncryptedIo(std::io::Error),
  /// Error parsing the plaintext file
  #[error("Plaintext file parse error: {0}")]
  PlaintextParse(ParseError),
  /// Error parsing the encrypted file
  #[error("Encrypted file parse error: {0}")]
  EncryptedParse(ParseError),
  /// The injected capability failed; nothing was written
  #[error(transparent)]
  Cipher(#[from] CipherError),
  /// Error writing the output file
  #[error("Write error: {0}")]
  Write(std::io::Error),
}
