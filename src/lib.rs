//! Part authentication by Reed-Solomon comparison of piezoelectric
//! impedance signatures.
//!
//! A master signature is encoded once per part type and only its check
//! symbols are kept. A candidate is accepted when the candidate followed by
//! the master's check symbols decodes, i.e. when it differs from the master
//! in at most `r / 2` symbols.
//!
//! ```
//! use piezo_rs::{CodecConfig, Comparator};
//!
//! let cmp = Comparator::new(&CodecConfig::new(8, 4).unwrap()).unwrap();
//! let master = cmp.enroll(vec![3, 17, 255, 0, 9, 9, 9, 1, 1, 1]).unwrap();
//! assert!(cmp.check_candidate(&master, &[3, 17, 254, 0, 9, 9, 9, 1, 1, 1]).unwrap().is_match());
//! ```

pub mod calibrate;
pub mod config;
pub mod gf;
pub mod poly;
pub mod registry;
pub mod rs;
pub mod signature;

#[cfg(feature = "python")]
mod python;

pub use calibrate::{calibrate, CheckRange};
pub use config::{CodecConfig, ConfigError};
pub use gf::{FieldError, GaloisField, Symbol};
pub use poly::PolyError;
pub use registry::SignatureRegistry;
pub use rs::{DecodeFailure, Decoded, EncodeError, ReedSolomon};
pub use signature::{check_candidate, CompareError, Comparator, ComparisonResult, MasterSignature};
