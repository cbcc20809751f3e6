// Codec parameters.
//
// A `CodecConfig` fixes the field size and the number of check symbols used
// for every part type enrolled under it. Half the check symbols is the number
// of differing signature symbols still accepted as the same part, so this is
// the knob to tune against real sensor noise (see calibrate.rs).
//
// ```toml
// field_exponent = 14
// check_symbols = 3000
// ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::gf::{FieldError, GaloisField, DEFAULT_EXPONENT, MAX_EXPONENT, MIN_EXPONENT};
use crate::rs::ReedSolomon;

pub const DEFAULT_CHECK_SYMBOLS: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse codec config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("{check_symbols} check symbols leave no room for a message in GF(2^{field_exponent})")]
    TooManyCheckSymbols { field_exponent: u8, check_symbols: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// m in GF(2^m); codewords hold at most 2^m - 1 symbols.
    pub field_exponent: u8,
    /// r, the number of check symbols appended to each master signature.
    pub check_symbols: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self { field_exponent: DEFAULT_EXPONENT, check_symbols: DEFAULT_CHECK_SYMBOLS }
    }
}

impl CodecConfig {
    pub fn new(field_exponent: u8, check_symbols: usize) -> Result<Self, ConfigError> {
        let config = Self { field_exponent, check_symbols };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&self.field_exponent) {
            return Err(FieldError::UnsupportedExponent(self.field_exponent).into());
        }
        let order = (1usize << self.field_exponent) - 1;
        if self.check_symbols >= order {
            return Err(ConfigError::TooManyCheckSymbols {
                field_exponent: self.field_exponent,
                check_symbols: self.check_symbols,
            });
        }
        Ok(())
    }

    pub fn field(&self) -> Result<Arc<GaloisField>, FieldError> {
        GaloisField::shared(self.field_exponent)
    }

    pub fn codec(&self) -> Result<ReedSolomon, ConfigError> {
        self.validate()?;
        ReedSolomon::new(self.field()?, self.check_symbols).map_err(|_| ConfigError::TooManyCheckSymbols {
            field_exponent: self.field_exponent,
            check_symbols: self.check_symbols,
        })
    }
}
