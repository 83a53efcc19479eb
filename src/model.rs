//! Data model for processor records and workload reference tables.
//!
//! Both datasets are loaded once (see [`crate::data`]) and never mutated
//! afterwards. Everything derived from them (comparisons, sizing results)
//! lives in its own module and borrows from here.
//!
//! # Processor kinds
//!
//! Records are tagged with a [`ProcessorKind`]. The kind decides which
//! fields are meaningful:
//! - `Power` / `Intel`: benchmark scores, threads, frequency, caches, TDP
//! - `Mainframe`: MIPS rating and MIPS per core
//!
//! Kind-specific fields are optional in the JSON documents; the loader
//! rejects records that lack the score their kind is measured by.

use serde::{Deserialize, Serialize};

/// Architecture tag for a processor record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessorKind {
    Power,
    Intel,
    Mainframe,
}

impl ProcessorKind {
    pub const ALL: [ProcessorKind; 3] = [Self::Power, Self::Intel, Self::Mainframe];

    /// Parse from string, case-insensitive.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "power" => Some(Self::Power),
            "intel" | "x86" => Some(Self::Intel),
            "mainframe" | "z" => Some(Self::Mainframe),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Intel => "intel",
            Self::Mainframe => "mainframe",
        }
    }

    /// Label used in selector placeholders and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Power => "POWER",
            Self::Intel => "Intel",
            Self::Mainframe => "Mainframe",
        }
    }

    #[inline]
    pub fn is_mainframe(&self) -> bool {
        matches!(self, Self::Mainframe)
    }
}

// ============================================================================
// Processor Records
// ============================================================================

/// One processor as described in the processor dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub architecture: String,
    pub year: u32,
    pub cores: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<u32>,
    /// Base frequency in GHz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    /// Thermal design power in watts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tdp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l1_cache: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l2_cache: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l3_cache: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_bandwidth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_case: Option<String>,

    // Benchmark scores (non-mainframe)

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_thread_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_thread_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub virtualization_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hpc_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_score: Option<f64>,

    // Capacity rating (mainframe)

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mips: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mips_per_core: Option<f64>,

    // Cross-vendor equivalence labels

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_equivalent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intel_equivalent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor_intensive_equivalent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commercial_equivalent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bi_equivalent: Option<String>,
}

impl ProcessorRecord {
    /// MIPS rating, zero when absent.
    #[inline]
    pub fn mips(&self) -> f64 {
        self.mips.unwrap_or(0.0)
    }

    /// Multi-thread benchmark score, zero when absent.
    #[inline]
    pub fn multi_thread(&self) -> f64 {
        self.multi_thread_score.unwrap_or(0.0)
    }

    /// Single-thread benchmark score, zero when absent.
    #[inline]
    pub fn single_thread(&self) -> f64 {
        self.single_thread_score.unwrap_or(0.0)
    }

    #[inline]
    pub fn thread_count(&self) -> u32 {
        self.threads.unwrap_or(0)
    }

    /// Workload sub-scores in radar order:
    /// virtualization, database, AI/ML, HPC, general.
    pub fn workload_scores(&self) -> [f64; 5] {
        [
            self.virtualization_score.unwrap_or(0.0),
            self.database_score.unwrap_or(0.0),
            self.ai_score.unwrap_or(0.0),
            self.hpc_score.unwrap_or(0.0),
            self.general_score.unwrap_or(0.0),
        ]
    }
}

/// Processors of one generation, e.g. POWER9 or Skylake.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessorFamily {
    pub kind: ProcessorKind,
    /// Key used in the JSON document (`power9`, `z10EC`, ...).
    pub key: &'static str,
    /// Display label for option groups.
    pub label: &'static str,
    pub processors: Vec<ProcessorRecord>,
}

/// All processor families in display order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessorCatalog {
    pub families: Vec<ProcessorFamily>,
}

impl ProcessorCatalog {
    /// Families of one kind, in display order.
    pub fn families_of(&self, kind: ProcessorKind) -> impl Iterator<Item = &ProcessorFamily> {
        self.families.iter().filter(move |f| f.kind == kind)
    }

    /// Look a processor up by id within the families of `kind`.
    pub fn find(&self, id: &str, kind: ProcessorKind) -> Option<&ProcessorRecord> {
        if id.is_empty() {
            return None;
        }
        self.families_of(kind)
            .flat_map(|f| f.processors.iter())
            .find(|p| p.id == id)
    }

    /// Look a processor up by id in every family, returning its kind too.
    pub fn find_any(&self, id: &str) -> Option<(ProcessorKind, &ProcessorRecord)> {
        self.families
            .iter()
            .flat_map(|f| f.processors.iter().map(move |p| (f.kind, p)))
            .find(|(_, p)| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.families.iter().map(|f| f.processors.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Workload Reference Table
// ============================================================================

/// A workload category and its tpm/MIPS conversion factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadType {
    pub id: String,
    pub name: String,
    /// Transactions per minute delivered per MIPS for this workload.
    pub tpm_per_mips: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub characteristics: Vec<String>,
}

/// MIPS-per-core factors of the two reference architectures used for sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionFactors {
    /// Itanium-class reference, reported as the POWER target.
    pub itanium_mips_per_core: f64,
    /// Xeon-class reference, reported as the Intel target.
    pub xeon_mips_per_core: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationSizingTable {
    pub conversion_factors: ConversionFactors,
}

/// The workload document: workload types plus sizing factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadData {
    pub workload_types: Vec<WorkloadType>,
    pub migration_sizing: MigrationSizingTable,
}

impl WorkloadData {
    pub fn find(&self, id: &str) -> Option<&WorkloadType> {
        if id.is_empty() {
            return None;
        }
        self.workload_types.iter().find(|w| w.id == id)
    }

    pub fn conversion_factors(&self) -> ConversionFactors {
        self.migration_sizing.conversion_factors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ProcessorRecord {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": id,
            "year": 2020,
            "cores": 8,
            "multiThreadScore": 1000.0
        }))
        .unwrap()
    }

    #[test]
    fn kind_parsing_is_case_insensitive() {
        assert_eq!(ProcessorKind::from_str("POWER"), Some(ProcessorKind::Power));
        assert_eq!(ProcessorKind::from_str(" intel "), Some(ProcessorKind::Intel));
        assert_eq!(ProcessorKind::from_str("Mainframe"), Some(ProcessorKind::Mainframe));
        assert_eq!(ProcessorKind::from_str("sparc"), None);
    }

    #[test]
    fn missing_optional_fields_default_to_none() {
        let r = record("x");
        assert_eq!(r.threads, None);
        assert_eq!(r.mips, None);
        assert_eq!(r.mips(), 0.0);
        assert_eq!(r.multi_thread(), 1000.0);
        assert_eq!(r.workload_scores(), [0.0; 5]);
    }

    #[test]
    fn find_respects_kind() {
        let catalog = ProcessorCatalog {
            families: vec![
                ProcessorFamily {
                    kind: ProcessorKind::Power,
                    key: "power9",
                    label: "POWER9",
                    processors: vec![record("p9")],
                },
                ProcessorFamily {
                    kind: ProcessorKind::Intel,
                    key: "skylake",
                    label: "Skylake",
                    processors: vec![record("sky")],
                },
            ],
        };

        assert!(catalog.find("p9", ProcessorKind::Power).is_some());
        assert!(catalog.find("p9", ProcessorKind::Intel).is_none());
        assert!(catalog.find("", ProcessorKind::Power).is_none());
        assert_eq!(catalog.find_any("sky").map(|(k, _)| k), Some(ProcessorKind::Intel));
        assert_eq!(catalog.len(), 2);
    }
}
