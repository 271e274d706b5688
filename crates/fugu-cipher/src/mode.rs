//! Chaining mode selector

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CipherError;

/// Block chaining mode.
///
/// The numeric selectors (`Ecb = 0`, `Cbc = 1`, `Cfb = 2`) are accepted by
/// [`TryFrom<u8>`]; text names by [`FromStr`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Electronic Codebook: every block transformed independently.
    #[default]
    Ecb,
    /// Cipher Block Chaining: plaintext XOR previous ciphertext, then encrypt.
    Cbc,
    /// Cipher Feedback: encrypt previous ciphertext, XOR with plaintext.
    Cfb,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Ecb => "ecb",
            Mode::Cbc => "cbc",
            Mode::Cfb => "cfb",
        }
    }

    /// Whether this mode reads and advances the chaining register.
    pub fn is_chained(self) -> bool {
        !matches!(self, Mode::Ecb)
    }
}

impl TryFrom<u8> for Mode {
    type Error = CipherError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(Mode::Ecb),
            1 => Ok(Mode::Cbc),
            2 => Ok(Mode::Cfb),
            other => Err(CipherError::InvalidMode(format!("selector {other}"))),
        }
    }
}

impl FromStr for Mode {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ecb" => Ok(Mode::Ecb),
            "cbc" => Ok(Mode::Cbc),
            "cfb" => Ok(Mode::Cfb),
            _ => Err(CipherError::InvalidMode(format!("{s:?}"))),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_values() {
        assert_eq!(Mode::try_from(0).unwrap(), Mode::Ecb);
        assert_eq!(Mode::try_from(1).unwrap(), Mode::Cbc);
        assert_eq!(Mode::try_from(2).unwrap(), Mode::Cfb);
    }

    #[test]
    fn test_out_of_range_selector() {
        let err = Mode::try_from(3).unwrap_err();
        assert!(matches!(err, CipherError::InvalidMode(_)));
        assert_eq!(err.to_string(), "invalid mode: selector 3");
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("ecb".parse::<Mode>().unwrap(), Mode::Ecb);
        assert_eq!("CBC".parse::<Mode>().unwrap(), Mode::Cbc);
        assert_eq!("Cfb".parse::<Mode>().unwrap(), Mode::Cfb);
        assert!("ofb".parse::<Mode>().is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        for mode in [Mode::Ecb, Mode::Cbc, Mode::Cfb] {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_default_is_ecb() {
        assert_eq!(Mode::default(), Mode::Ecb);
        assert!(!Mode::Ecb.is_chained());
        assert!(Mode::Cbc.is_chained());
    }
}
