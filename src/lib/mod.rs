//! Encrypted environment file synchronization library.
//!
//! This library keeps a plaintext `.env` file (gitignored) in sync with an
//! encrypted `.env.encrypted` counterpart that is safe to commit. Encryption
//! and decryption are delegated to an injected [`cipher::Cipher`] capability,
//! such as AWS KMS; the library itself implements no cryptography.
//!
//! # Features
//!
//! - **Change detection**: the existing encrypted file is decrypted and
//!   diffed against the current plaintext; when nothing changed, the
//!   encrypted file is left untouched (content and modification time)
//! - **Full rewrites**: any change re-encrypts the entire value set, so the
//!   encrypted file never mixes ciphertext generations
//! - **Deterministic output**: entries are always written in sorted key
//!   order, keeping the committed file diff-friendly
//! - **Optional tracing**: detailed logging when the `tracing` feature is
//!   enabled
//!
//! # Example
//!
//! ```rust,no_run
//! use env_crypt::sync::{EnvCrypt, EnvCryptOptions};
//! # use env_crypt::cipher::{Cipher, CipherError};
//! # struct MyCipher;
//! # #[async_trait::async_trait]
//! # impl Cipher for MyCipher {
//! #   async fn encrypt(&self, p: &str, _k: &str) -> Result<String, CipherError> { Ok(p.into()) }
//! #   async fn decrypt(&self, c: &str, _k: &str) -> Result<String, CipherError> { Ok(c.into()) }
//! #   fn name(&self) -> &'static str { "my-cipher" }
//! # }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = EnvCryptOptions {
//!   plaintext_file: None, // defaults to .env
//!   encrypted_file: None, // defaults to .env.encrypted
//! };
//!
//! let env_crypt = EnvCrypt::new(MyCipher, options);
//! env_crypt.encrypt_and_write(&[]).await?;
//! # Ok(())
//! # }
//! ```

pub mod cipher;
pub mod diff;
pub mod map;
pub mod parse;
pub mod render;
pub mod sync;
