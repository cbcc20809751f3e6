// Master signatures keyed by part type.
//
// Candidate checks vastly outnumber enrollments, so the map sits behind a
// readers-writer lock and each entry is an `Arc` snapshot: a check clones the
// `Arc` under the read guard and decodes with the lock released, while
// `enroll` encodes first and only takes the write guard to swap the entry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::{CodecConfig, ConfigError};
use crate::gf::Symbol;
use crate::signature::{CompareError, Comparator, ComparisonResult, MasterSignature};

#[derive(Debug)]
pub struct SignatureRegistry {
    comparator: Comparator,
    masters: RwLock<HashMap<String, Arc<MasterSignature>>>,
}

impl SignatureRegistry {
    pub fn new(config: &CodecConfig) -> Result<Self, ConfigError> {
        Ok(Self { comparator: Comparator::new(config)?, masters: RwLock::new(HashMap::new()) })
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// Enrolls `master_message` for `part_type`, replacing any previous master.
    pub fn enroll(
        &self,
        part_type: impl Into<String>,
        master_message: Vec<Symbol>,
    ) -> Result<Arc<MasterSignature>, CompareError> {
        let part_type = part_type.into();
        let master = Arc::new(self.comparator.enroll(master_message)?);
        let replaced = self.masters.write().insert(part_type.clone(), Arc::clone(&master));
        info!(
            part_type = %part_type,
            k = master.len(),
            r = master.check_symbol_count(),
            replaced = replaced.is_some(),
            "enrolled master signature"
        );
        Ok(master)
    }

    /// Installs a master loaded from storage. It must have been enrolled with
    /// this registry's codec parameters.
    pub fn insert(
        &self,
        part_type: impl Into<String>,
        master: MasterSignature,
    ) -> Result<Option<Arc<MasterSignature>>, CompareError> {
        if master.config() != self.comparator.config() {
            return Err(CompareError::IncompatibleMaster {
                field_exponent: master.field_exponent(),
                check_symbols: master.check_symbol_count(),
            });
        }
        let part_type = part_type.into();
        debug!(part_type = %part_type, "loaded master signature");
        Ok(self.masters.write().insert(part_type, Arc::new(master)))
    }

    pub fn master(&self, part_type: &str) -> Option<Arc<MasterSignature>> {
        self.masters.read().get(part_type).cloned()
    }

    pub fn check_candidate(&self, part_type: &str, candidate: &[Symbol]) -> Result<ComparisonResult, CompareError> {
        let master = self.master(part_type).ok_or_else(|| CompareError::UnknownPartType(part_type.to_owned()))?;
        let result = self.comparator.check_candidate(&master, candidate)?;
        debug!(part_type, matched = result.is_match(), "checked candidate");
        Ok(result)
    }

    /// Removes the master for a retired part type.
    pub fn retire(&self, part_type: &str) -> Option<Arc<MasterSignature>> {
        let removed = self.masters.write().remove(part_type);
        if removed.is_some() {
            info!(part_type, "retired part type");
        }
        removed
    }

    /// Enrolled part types, sorted.
    pub fn part_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.masters.read().keys().cloned().collect();
        types.sort();
        types
    }
}
