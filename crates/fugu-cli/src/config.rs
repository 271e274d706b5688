use anyhow::{Context, Result};
use fugu_cipher::{ChainBlock, Mode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level CLI configuration (loaded from fugu.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FuguConfig {
    pub cipher: CipherConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// Chaining mode: "ecb", "cbc" or "cfb" (default: ecb)
    pub mode: Mode,
    /// Initialization vector as 16 hex digits (default: all zero)
    pub iv: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base64-wrap ciphertext on encrypt and expect it on decrypt
    pub armor: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Ecb,
            iv: "0000000000000000".into(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { armor: true }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: "text".into(),
        }
    }
}

/// Load configuration from `path`, falling back to defaults if it does not exist.
pub fn load_config(path: &Path) -> Result<FuguConfig> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config: {}", path.display()))
    } else {
        Ok(FuguConfig::default())
    }
}

/// Parse a 64-bit IV written as 16 hex digits (left half first).
pub fn parse_iv(s: &str) -> Result<ChainBlock> {
    let s = s.trim();
    let s = s.strip_prefix("0x").unwrap_or(s);
    anyhow::ensure!(s.len() == 16, "IV must be 16 hex digits, got {}", s.len());
    let value = u64::from_str_radix(s, 16).with_context(|| format!("invalid IV hex: {s:?}"))?;
    Ok(ChainBlock::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[cipher]
mode = "cbc"
iv = "FEDCBA9876543210"

[output]
armor = false

[log]
level = "debug"
format = "json"
"#;
        let config: FuguConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.cipher.mode, Mode::Cbc);
        assert_eq!(config.cipher.iv, "FEDCBA9876543210");
        assert!(!config.output.armor);
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, "json");
    }

    #[test]
    fn test_parse_defaults() {
        let config: FuguConfig = toml::from_str("").unwrap();

        assert_eq!(config.cipher.mode, Mode::Ecb);
        assert_eq!(config.cipher.iv, "0000000000000000");
        assert!(config.output.armor);
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.format, "text");
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[cipher]
mode = "cfb"
"#;
        let config: FuguConfig = toml::from_str(toml_str).unwrap();

        // Overridden
        assert_eq!(config.cipher.mode, Mode::Cfb);
        // Defaults
        assert_eq!(config.cipher.iv, "0000000000000000");
        assert!(config.output.armor);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let result: Result<FuguConfig, _> = toml::from_str("[cipher]\nmode = \"ofb\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = FuguConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: FuguConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.cipher.mode, parsed.cipher.mode);
        assert_eq!(config.cipher.iv, parsed.cipher.iv);
        assert_eq!(config.log.level, parsed.log.level);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.cipher.mode, Mode::Ecb);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cipher]\nmode = \"cbc\"\niv = \"0102030405060708\"").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.cipher.mode, Mode::Cbc);
        assert_eq!(
            parse_iv(&config.cipher.iv).unwrap(),
            ChainBlock::new(0x0102_0304, 0x0506_0708)
        );
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cipher\nmode =").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_parse_iv() {
        assert_eq!(
            parse_iv("0xFEDCBA9876543210").unwrap(),
            ChainBlock::new(0xFEDC_BA98, 0x7654_3210)
        );
        assert!(parse_iv("1234").is_err());
        assert!(parse_iv("zzzzzzzzzzzzzzzz").is_err());
    }
}
