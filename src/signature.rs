// Signature comparison.
//
// A part type is enrolled once from a master signature: the master message is
// RS-encoded and its check symbols kept. A candidate signature is then judged
// by appending the master's check symbols to it and decoding. If the candidate
// differs from the master in at most `r / 2` symbols the word decodes and the
// candidate is accepted as the same part; otherwise decoding fails.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{CodecConfig, ConfigError};
use crate::gf::{FieldError, GaloisField, Symbol};
use crate::rs::{DecodeFailure, Decoded, EncodeError, ReedSolomon};

#[derive(Debug, thiserror::Error)]
pub enum CompareError {
    #[error("candidate has {actual} symbols, master has {expected}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid master signature: {0}")]
    InvalidMaster(&'static str),
    #[error(
        "master uses GF(2^{field_exponent}) with {check_symbols} check symbols, \
         comparator is configured differently"
    )]
    IncompatibleMaster { field_exponent: u8, check_symbols: usize },
    #[error("no master signature enrolled for part type {0:?}")]
    UnknownPartType(String),
}

/// The enrolled reference for a part type: the master message and the check
/// symbols computed for it. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MasterRecord", into = "MasterRecord")]
pub struct MasterSignature {
    field_exponent: u8,
    message: Vec<Symbol>,
    check_symbols: Vec<Symbol>,
}

/// On-disk shape of a master signature, validated on the way in.
#[derive(Serialize, Deserialize)]
struct MasterRecord {
    field_exponent: u8,
    r: usize,
    message: Vec<Symbol>,
    check_symbols: Vec<Symbol>,
}

impl From<MasterSignature> for MasterRecord {
    fn from(master: MasterSignature) -> Self {
        Self {
            field_exponent: master.field_exponent,
            r: master.check_symbols.len(),
            message: master.message,
            check_symbols: master.check_symbols,
        }
    }
}

impl TryFrom<MasterRecord> for MasterSignature {
    type Error = CompareError;

    fn try_from(record: MasterRecord) -> Result<Self, Self::Error> {
        Self::from_parts(record.field_exponent, record.r, record.message, record.check_symbols)
    }
}

impl MasterSignature {
    /// Rebuilds a master from stored parts. The check symbols must be exactly
    /// the ones the encoder produces for `message`.
    pub fn from_parts(
        field_exponent: u8,
        r: usize,
        message: Vec<Symbol>,
        check_symbols: Vec<Symbol>,
    ) -> Result<Self, CompareError> {
        if check_symbols.len() != r {
            return Err(CompareError::InvalidMaster("check symbol count does not match r"));
        }
        let codec = CodecConfig::new(field_exponent, r)?.codec()?;
        if codec.check_symbols(&message)? != check_symbols {
            return Err(CompareError::InvalidMaster("check symbols do not match the message"));
        }
        Ok(Self { field_exponent, message, check_symbols })
    }

    pub fn field_exponent(&self) -> u8 {
        self.field_exponent
    }

    /// k, the signature length every candidate must have.
    pub fn len(&self) -> usize {
        self.message.len()
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }

    /// r, the number of check symbols.
    pub fn check_symbol_count(&self) -> usize {
        self.check_symbols.len()
    }

    pub fn message(&self) -> &[Symbol] {
        &self.message
    }

    pub fn check_symbols(&self) -> &[Symbol] {
        &self.check_symbols
    }

    pub fn config(&self) -> CodecConfig {
        CodecConfig { field_exponent: self.field_exponent, check_symbols: self.check_symbols.len() }
    }

    /// Number of positions where `candidate` differs from the master message.
    pub fn num_differences(&self, candidate: &[Symbol]) -> Result<usize, CompareError> {
        if candidate.len() != self.message.len() {
            return Err(CompareError::LengthMismatch { expected: self.message.len(), actual: candidate.len() });
        }
        Ok(self.message.iter().zip(candidate).filter(|(a, b)| a != b).count())
    }
}

/// Outcome of checking a candidate against a master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonResult {
    /// The candidate decoded; `Decoded::positions` lists symbols that were
    /// treated as measurement noise.
    Match(Decoded),
    /// The candidate is a different (or tampered) part.
    Mismatch(DecodeFailure),
}

impl ComparisonResult {
    pub fn is_match(&self) -> bool {
        matches!(self, ComparisonResult::Match(_))
    }
}

/// Enrolls masters and checks candidates for one codec configuration.
#[derive(Debug, Clone)]
pub struct Comparator {
    codec: ReedSolomon,
}

impl Comparator {
    pub fn new(config: &CodecConfig) -> Result<Self, ConfigError> {
        Ok(Self { codec: config.codec()? })
    }

    /// A comparator matching the parameters the master was enrolled with.
    pub fn for_master(master: &MasterSignature) -> Result<Self, CompareError> {
        Ok(Self::new(&master.config())?)
    }

    pub fn codec(&self) -> &ReedSolomon {
        &self.codec
    }

    pub fn field(&self) -> &GaloisField {
        self.codec.field()
    }

    pub fn config(&self) -> CodecConfig {
        CodecConfig { field_exponent: self.field().exponent(), check_symbols: self.codec.nsym() }
    }

    pub fn enroll(&self, master_message: Vec<Symbol>) -> Result<MasterSignature, CompareError> {
        let check_symbols = self.codec.check_symbols(&master_message)?;
        Ok(MasterSignature { field_exponent: self.field().exponent(), message: master_message, check_symbols })
    }

    pub fn check_candidate(
        &self,
        master: &MasterSignature,
        candidate: &[Symbol],
    ) -> Result<ComparisonResult, CompareError> {
        if master.config() != self.config() {
            return Err(CompareError::IncompatibleMaster {
                field_exponent: master.field_exponent,
                check_symbols: master.check_symbol_count(),
            });
        }
        let k = master.len();
        if candidate.len() != k {
            return Err(CompareError::LengthMismatch { expected: k, actual: candidate.len() });
        }
        for &symbol in candidate {
            self.field().check(symbol)?;
        }

        // With no check symbols every word decodes, so fall back to equality.
        if self.codec.nsym() == 0 {
            let differences = master.num_differences(candidate)?;
            return Ok(if differences == 0 {
                ComparisonResult::Match(Decoded { message: candidate.to_vec(), positions: vec![] })
            } else {
                ComparisonResult::Mismatch(DecodeFailure::TooManyErrors { located: differences, bound: 0 })
            });
        }

        let mut received = Vec::with_capacity(k + master.check_symbol_count());
        received.extend_from_slice(candidate);
        received.extend_from_slice(master.check_symbols());

        Ok(match self.codec.decode(&received, k) {
            Ok(decoded) => {
                debug!(k, corrections = decoded.corrections(), "candidate matched");
                ComparisonResult::Match(decoded)
            }
            Err(reason) => {
                debug!(k, %reason, "candidate mismatched");
                ComparisonResult::Mismatch(reason)
            }
        })
    }
}

/// Checks `candidate` against `master` using the master's own parameters.
pub fn check_candidate(master: &MasterSignature, candidate: &[Symbol]) -> Result<ComparisonResult, CompareError> {
    Comparator::for_master(master)?.check_candidate(master, candidate)
}
