use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
  name = "env-crypt",
  about = "Keep secrets in version control: sync a .env file with a committable encrypted copy",
  version,
  author
)]
struct Cli {
  /// Path to the plaintext env file
  #[arg(short, long)]
  env_file: Option<PathBuf>,

  /// Path to the encrypted env file
  #[arg(short = 'f', long)]
  encrypted_file: Option<PathBuf>,

  /// Verbose output (-v for verbose, -vv for very verbose)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Encrypt the plaintext env file into the encrypted file
  Encrypt {
    /// KMS key id or ARN
    #[arg(short, long)]
    key: String,

    /// AWS region (defaults to the ambient AWS configuration)
    #[arg(short, long)]
    region: Option<String>,
  },

  /// Decrypt the encrypted env file back into the plaintext file
  Decrypt {
    /// KMS key id or ARN
    #[arg(short, long)]
    key: String,

    /// AWS region (defaults to the ambient AWS configuration)
    #[arg(short, long)]
    region: Option<String>,
  },
}

fn setup_tracing(verbose: u8) {
  use tracing_subscriber::fmt;
  use tracing_subscriber::prelude::*;

  let log_level = match verbose {
    1 => "debug",
    2 => "trace",
    _ => "info",
  };

  tracing_subscriber::registry()
    .with(fmt::layer())
    .with(tracing_subscriber::EnvFilter::new(
      std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
    ))
    .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  let cli = Cli::parse();

  setup_tracing(cli.verbose);

  run(cli).await
}

#[cfg(feature = "aws")]
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
  use env_crypt::cipher::aws::AwsKms;
  use env_crypt::sync::{EnvCrypt, EnvCryptOptions, SyncOutcome};

  let options = EnvCryptOptions {
    plaintext_file: cli.env_file,
    encrypted_file: cli.encrypted_file,
  };

  match cli.command {
    Command::Encrypt { key, region } => {
      let comment_lines = provenance_comments(&key, region.as_deref());
      let env_crypt = EnvCrypt::new(AwsKms::new(key, region), options);

      match env_crypt.encrypt_and_write(&comment_lines).await? {
        SyncOutcome::Unchanged => {
          println!("No differences. Skipping encryption step");
        }
        SyncOutcome::Written(diff) => {
          if !diff.changed_keys.is_empty() {
            println!("Encrypted changed keys:");
            for key in &diff.changed_keys {
              println!("  {}", key);
            }
          }
          if !diff.removed_keys.is_empty() {
            println!("The following keys were removed:");
            for key in &diff.removed_keys {
              println!("  {}", key);
            }
          }
          println!(
            "Successfully encrypted values into {}",
            env_crypt.encrypted_path().display()
          );
        }
      }
    }

    Command::Decrypt { key, region } => {
      let env_crypt = EnvCrypt::new(AwsKms::new(key, region), options);
      env_crypt.decrypt_and_write().await?;
      println!(
        "Successfully decrypted values into {}",
        env_crypt.plaintext_path().display()
      );
    }
  }

  Ok(())
}

/// Comment lines written at the top of the encrypted file, documenting how
/// it was produced and how to decrypt it.
#[cfg(feature = "aws")]
fn provenance_comments(key: &str, region: Option<&str>) -> Vec<String> {
  let mut decrypt_cmd = format!("env-crypt decrypt --key {}", key);
  if let Some(region) = region {
    decrypt_cmd.push_str(" --region ");
    decrypt_cmd.push_str(region);
  }

  vec![
    format!("# Generated by env-crypt {}", env!("CARGO_PKG_VERSION")),
    format!("# To decrypt, run: {}", decrypt_cmd),
  ]
}

#[cfg(not(feature = "aws"))]
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
  use env_crypt::sync::EnvCryptOptions;

  // Arguments are resolved the same way as in a full build, so invocations
  // fail on the missing backend rather than on argument parsing.
  let _options = EnvCryptOptions {
    plaintext_file: cli.env_file,
    encrypted_file: cli.encrypted_file,
  };
  let (operation, _key, _region) = match cli.command {
    Command::Encrypt { key, region } => ("encrypt", key, region),
    Command::Decrypt { key, region } => ("decrypt", key, region),
  };

  Err(
    format!(
      "Cannot {}: AWS KMS support is not compiled into this binary. \
       Reinstall with: cargo install env-crypt --features aws",
      operation
    )
    .into(),
  )
}
