//! fugu: Blowfish file and stream encryption
//!
//! Commands:
//!   encrypt        - pad and encrypt stdin (or --input) to stdout (or --output)
//!   decrypt        - decrypt and unpad
//!   config show    - display the merged configuration
//!
//! The key is read from --key / FUGU_KEY as hex, or prompted for on the terminal.

mod armor;
mod config;
mod key;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fugu_cipher::{Cipher, Mode};
use secrecy::SecretString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::config::FuguConfig;

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "fugu",
    version,
    about = "Blowfish encryption in ECB, CBC and CFB modes",
    long_about = "fugu: encrypt and decrypt files or streams with the Blowfish block cipher"
)]
struct Cli {
    /// Path to fugu.toml configuration file
    #[arg(long, short = 'c', env = "FUGU_CONFIG", default_value = "fugu.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides config
    #[arg(long, env = "FUGU_LOG")]
    log: Option<String>,

    /// Log format; overrides config
    #[arg(long)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt input; any length is accepted (PKCS#7-style padding)
    Encrypt(CryptArgs),

    /// Decrypt input produced by `fugu encrypt`
    Decrypt(CryptArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the active configuration (merged defaults + config file)
    Show,
}

#[derive(Args)]
struct CryptArgs {
    /// Key as hex (1 to 56 bytes); prompted for if absent
    #[arg(long, env = "FUGU_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Chaining mode (ecb, cbc, cfb); overrides config
    #[arg(long, short = 'm')]
    mode: Option<Mode>,

    /// IV as 16 hex digits; overrides config
    #[arg(long)]
    iv: Option<String>,

    /// Base64-armor the ciphertext
    #[arg(long, conflicts_with = "raw")]
    armor: bool,

    /// Raw binary ciphertext
    #[arg(long)]
    raw: bool,

    /// Input file (default: stdin)
    #[arg(long, short = 'i')]
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

impl std::fmt::Debug for CryptArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptArgs")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("mode", &self.mode)
            .field("iv", &self.iv)
            .field("armor", &self.armor)
            .field("raw", &self.raw)
            .field("input", &self.input)
            .field("output", &self.output)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

/// Settings after merging flags over the config file
#[derive(Debug)]
struct Resolved {
    mode: Mode,
    iv: fugu_cipher::ChainBlock,
    armor: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_config(&cli.config)?;

    let level = cli.log.clone().unwrap_or_else(|| config.log.level.clone());
    let format = match cli.log_format {
        Some(format) => format,
        None => parse_log_format(&config.log.format)?,
    };
    init_logging(&level, format);

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "fugu starting"
    );

    match cli.command {
        Commands::Encrypt(args) => cmd_encrypt(&config, &args),
        Commands::Decrypt(args) => cmd_decrypt(&config, &args),
        Commands::Config { action: ConfigAction::Show } => cmd_config_show(&config, &cli.config),
    }
}

fn parse_log_format(s: &str) -> Result<LogFormat> {
    LogFormat::from_str(s, true).map_err(|e| anyhow::anyhow!("invalid log format {s:?}: {e}"))
}

fn init_logging(level: &str, format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries cipher output, so logs go to stderr
    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn resolve(config: &FuguConfig, args: &CryptArgs) -> Result<Resolved> {
    let mode = args.mode.unwrap_or(config.cipher.mode);
    let iv_text = args.iv.as_deref().unwrap_or(&config.cipher.iv);
    let iv = config::parse_iv(iv_text)?;
    let armor = if args.raw {
        false
    } else {
        args.armor || config.output.armor
    };
    Ok(Resolved { mode, iv, armor })
}

fn build_cipher(args: &CryptArgs, resolved: &Resolved) -> Result<Cipher> {
    let supplied = args.key.clone().map(SecretString::from);
    let key = key::resolve_key(supplied.as_ref())?;
    Cipher::with_chain(&key, resolved.iv).context("initializing cipher")
}

// ── I/O ───────────────────────────────────────────────────────────────────────

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => std::fs::read(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf).context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&Path>, data: &[u8]) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, data).with_context(|| format!("writing {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data).context("writing stdout")?;
            stdout.flush().context("flushing stdout")
        }
    }
}

// ── `fugu encrypt` ────────────────────────────────────────────────────────────

fn cmd_encrypt(config: &FuguConfig, args: &CryptArgs) -> Result<()> {
    let resolved = resolve(config, args)?;
    let mut cipher = build_cipher(args, &resolved)?;
    let plaintext = read_input(args.input.as_deref())?;

    let ciphertext = encrypt_payload(&mut cipher, &plaintext, &resolved);
    tracing::info!(
        mode = %resolved.mode,
        armor = resolved.armor,
        bytes_in = plaintext.len(),
        bytes_out = ciphertext.len(),
        "encrypted"
    );
    write_output(args.output.as_deref(), &ciphertext)
}

fn encrypt_payload(cipher: &mut Cipher, plaintext: &[u8], resolved: &Resolved) -> Vec<u8> {
    let ciphertext = cipher.encrypt_padded(plaintext, resolved.mode);
    if resolved.armor {
        armor::encode(&ciphertext).into_bytes()
    } else {
        ciphertext
    }
}

// ── `fugu decrypt` ────────────────────────────────────────────────────────────

fn cmd_decrypt(config: &FuguConfig, args: &CryptArgs) -> Result<()> {
    let resolved = resolve(config, args)?;
    let mut cipher = build_cipher(args, &resolved)?;
    let input = read_input(args.input.as_deref())?;

    let plaintext = decrypt_payload(&mut cipher, &input, &resolved)?;
    tracing::info!(
        mode = %resolved.mode,
        armor = resolved.armor,
        bytes_in = input.len(),
        bytes_out = plaintext.len(),
        "decrypted"
    );
    write_output(args.output.as_deref(), &plaintext)
}

fn decrypt_payload(cipher: &mut Cipher, input: &[u8], resolved: &Resolved) -> Result<Vec<u8>> {
    let ciphertext = if resolved.armor {
        armor::decode(input)?
    } else {
        input.to_vec()
    };
    cipher
        .decrypt_padded(&ciphertext, resolved.mode)
        .context("decryption failed: wrong key, mode or IV, or corrupted input")
}

// ── `fugu config show` ────────────────────────────────────────────────────────

fn cmd_config_show(config: &FuguConfig, config_path: &Path) -> Result<()> {
    let mut out = String::new();
    if config_path.exists() {
        out.push_str(&format!("# Configuration from: {}\n", config_path.display()));
    } else {
        out.push_str(&format!(
            "# Configuration: defaults (no file at {})\n",
            config_path.display()
        ));
    }
    out.push('\n');
    let rendered = toml::to_string_pretty(config).context("serializing config to TOML")?;
    out.push_str(&rendered);
    write_output(None, out.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use fugu_cipher::ChainBlock;

    const KEY: &[u8] = &[0x22, 0x3C, 0x8A, 0xFF, 0xE0, 0xC3, 0x99, 0xFA, 0x03, 0x59, 0xA1, 0xBB];

    fn crypt_args(argv: &[&str]) -> CryptArgs {
        let mut full = vec!["fugu", "encrypt"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Encrypt(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = FuguConfig::default();
        config.cipher.mode = Mode::Cfb;
        config.output.armor = true;

        let args = crypt_args(&["--mode", "cbc", "--iv", "0102030405060708", "--raw"]);
        let resolved = resolve(&config, &args).unwrap();
        assert_eq!(resolved.mode, Mode::Cbc);
        assert_eq!(resolved.iv, ChainBlock::new(0x0102_0304, 0x0506_0708));
        assert!(!resolved.armor);
    }

    #[test]
    fn test_config_used_when_flags_absent() {
        let mut config = FuguConfig::default();
        config.cipher.mode = Mode::Cfb;
        config.cipher.iv = "FFFFFFFF00000000".into();

        let resolved = resolve(&config, &crypt_args(&[])).unwrap();
        assert_eq!(resolved.mode, Mode::Cfb);
        assert_eq!(resolved.iv, ChainBlock::new(0xFFFF_FFFF, 0));
        assert!(resolved.armor);
    }

    #[test]
    fn test_armor_and_raw_conflict() {
        let result = Cli::try_parse_from(["fugu", "encrypt", "--armor", "--raw"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_roundtrip() {
        let plaintext = b"the bad fox ducked under the barbed wire fence\0\x01";
        for mode in [Mode::Ecb, Mode::Cbc, Mode::Cfb] {
            for armor in [true, false] {
                let resolved = Resolved {
                    mode,
                    iv: ChainBlock::new(7, 9),
                    armor,
                };
                let mut enc = Cipher::with_chain(KEY, resolved.iv).unwrap();
                let mut dec = Cipher::with_chain(KEY, resolved.iv).unwrap();

                let wire = encrypt_payload(&mut enc, plaintext, &resolved);
                if armor {
                    assert!(wire.iter().all(u8::is_ascii));
                }
                let back = decrypt_payload(&mut dec, &wire, &resolved).unwrap();
                assert_eq!(back, plaintext);
            }
        }
    }

    #[test]
    fn test_wrong_iv_fails_or_differs() {
        let plaintext = b"sixteen byte msg and more";
        let good = Resolved {
            mode: Mode::Cbc,
            iv: ChainBlock::new(1, 2),
            armor: false,
        };
        let bad = Resolved {
            iv: ChainBlock::new(3, 4),
            ..good
        };
        let mut enc = Cipher::with_chain(KEY, good.iv).unwrap();
        let mut dec = Cipher::with_chain(KEY, bad.iv).unwrap();

        let wire = encrypt_payload(&mut enc, plaintext, &good);
        if let Ok(back) = decrypt_payload(&mut dec, &wire, &bad) {
            assert_ne!(back, plaintext);
        }
    }

    #[test]
    fn test_file_io_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");
        write_output(Some(&path), b"payload").unwrap();
        assert_eq!(read_input(Some(&path)).unwrap(), b"payload");
        assert!(read_input(Some(&dir.path().join("missing"))).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let args = crypt_args(&["--key", "223c8aff"]);
        let debug = format!("{args:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("223c8aff"));
    }

    #[test]
    fn test_parse_log_format() {
        assert!(matches!(parse_log_format("json").unwrap(), LogFormat::Json));
        assert!(matches!(parse_log_format("TEXT").unwrap(), LogFormat::Text));
        assert!(parse_log_format("xml").is_err());
    }
}
