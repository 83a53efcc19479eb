//! Dataset loading.
//!
//! The processor document is read first, then the workload document; both
//! must parse and validate before anything else runs. Built-in copies of
//! both documents are compiled into the binary and used when no path is
//! configured.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::DataError;
use crate::model::{
    ProcessorCatalog, ProcessorFamily, ProcessorKind, ProcessorRecord, WorkloadData,
};

const EMBEDDED_PROCESSORS: &str = include_str!("../data/processor-data.json");
const EMBEDDED_WORKLOADS: &str = include_str!("../data/workload-data.json");

const PROCESSOR_DOCUMENT: &str = "processor data";
const WORKLOAD_DOCUMENT: &str = "workload data";

/// Both datasets, immutable after load.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub processors: ProcessorCatalog,
    pub workloads: WorkloadData,
}

impl Datasets {
    /// Load from optional file paths, falling back to the embedded documents.
    pub fn load(processor_path: Option<&Path>, workload_path: Option<&Path>) -> Result<Self, DataError> {
        let processor_json = read_document(PROCESSOR_DOCUMENT, processor_path, EMBEDDED_PROCESSORS)?;
        let processors = parse_processors(&processor_json)?;

        let workload_json = read_document(WORKLOAD_DOCUMENT, workload_path, EMBEDDED_WORKLOADS)?;
        let workloads = parse_workloads(&workload_json)?;

        info!(
            processors = processors.len(),
            families = processors.families.len(),
            workloads = workloads.workload_types.len(),
            "datasets loaded"
        );

        Ok(Self { processors, workloads })
    }

    /// The datasets compiled into the binary.
    pub fn embedded() -> Result<Self, DataError> {
        Self::load(None, None)
    }
}

fn read_document(document: &'static str, path: Option<&Path>, fallback: &str) -> Result<String, DataError> {
    match path {
        Some(path) => {
            debug!(document, path = %path.display(), "reading dataset");
            std::fs::read_to_string(path).map_err(|source| DataError::Read {
                document,
                path: path.to_path_buf(),
                source,
            })
        }
        None => {
            debug!(document, "using embedded dataset");
            Ok(fallback.to_string())
        }
    }
}

// ============================================================================
// Processor Document
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProcessorData {
    power_processors: RawPowerFamilies,
    intel_processors: RawIntelFamilies,
    mainframe_processors: RawMainframeFamilies,
}

#[derive(Debug, Default, Deserialize)]
struct RawPowerFamilies {
    #[serde(default)]
    power8: Vec<ProcessorRecord>,
    #[serde(default)]
    power9: Vec<ProcessorRecord>,
    #[serde(default)]
    power10: Vec<ProcessorRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct RawIntelFamilies {
    #[serde(default)]
    haswell: Vec<ProcessorRecord>,
    #[serde(default)]
    skylake: Vec<ProcessorRecord>,
    #[serde(default)]
    icelake: Vec<ProcessorRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMainframeFamilies {
    #[serde(default, rename = "z10EC")]
    z10_ec: Vec<ProcessorRecord>,
    #[serde(default, rename = "z10BC")]
    z10_bc: Vec<ProcessorRecord>,
}

/// Parse and validate the processor document.
pub fn parse_processors(json: &str) -> Result<ProcessorCatalog, DataError> {
    let raw: RawProcessorData = serde_json::from_str(json).map_err(|source| DataError::Parse {
        document: PROCESSOR_DOCUMENT,
        source,
    })?;

    let catalog = ProcessorCatalog {
        families: vec![
            family(ProcessorKind::Power, "power8", "POWER8", raw.power_processors.power8),
            family(ProcessorKind::Power, "power9", "POWER9", raw.power_processors.power9),
            family(ProcessorKind::Power, "power10", "POWER10", raw.power_processors.power10),
            family(ProcessorKind::Intel, "haswell", "Haswell", raw.intel_processors.haswell),
            family(ProcessorKind::Intel, "skylake", "Skylake", raw.intel_processors.skylake),
            family(ProcessorKind::Intel, "icelake", "Ice Lake", raw.intel_processors.icelake),
            family(ProcessorKind::Mainframe, "z10EC", "z10 EC", raw.mainframe_processors.z10_ec),
            family(ProcessorKind::Mainframe, "z10BC", "z10 BC", raw.mainframe_processors.z10_bc),
        ],
    };

    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn family(
    kind: ProcessorKind,
    key: &'static str,
    label: &'static str,
    processors: Vec<ProcessorRecord>,
) -> ProcessorFamily {
    ProcessorFamily { kind, key, label, processors }
}

fn validate_catalog(catalog: &ProcessorCatalog) -> Result<(), DataError> {
    let mut seen = HashSet::new();

    for family in &catalog.families {
        for p in &family.processors {
            if p.id.trim().is_empty() {
                return Err(DataError::InvalidProcessor {
                    id: p.name.clone(),
                    reason: "empty id".to_string(),
                });
            }
            if !seen.insert(p.id.as_str()) {
                return Err(DataError::DuplicateProcessor(p.id.clone()));
            }

            let (field, value) = if family.kind.is_mainframe() {
                ("mips", p.mips)
            } else {
                ("multiThreadScore", p.multi_thread_score)
            };
            match value {
                Some(v) if v.is_finite() && v > 0.0 => {}
                _ => {
                    return Err(DataError::InvalidProcessor {
                        id: p.id.clone(),
                        reason: format!("{} processors need a positive {}", family.kind.id(), field),
                    })
                }
            }
        }
    }

    Ok(())
}

// ============================================================================
// Workload Document
// ============================================================================

/// Parse and validate the workload document.
pub fn parse_workloads(json: &str) -> Result<WorkloadData, DataError> {
    let data: WorkloadData = serde_json::from_str(json).map_err(|source| DataError::Parse {
        document: WORKLOAD_DOCUMENT,
        source,
    })?;

    for w in &data.workload_types {
        if !(w.tpm_per_mips.is_finite() && w.tpm_per_mips > 0.0) {
            return Err(DataError::InvalidWorkload {
                id: w.id.clone(),
                reason: format!("tpmPerMips must be positive, got {}", w.tpm_per_mips),
            });
        }
    }

    let factors = data.conversion_factors();
    for (name, value) in [
        ("itaniumMipsPerCore", factors.itanium_mips_per_core),
        ("xeonMipsPerCore", factors.xeon_mips_per_core),
    ] {
        if !(value.is_finite() && value > 0.0) {
            return Err(DataError::InvalidConversionFactor { name, value });
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_PROCESSORS: &str = r#"{
        "powerProcessors": {"power9": [{"id": "p9", "name": "P9", "year": 2017, "cores": 12, "multiThreadScore": 8000}]},
        "intelProcessors": {},
        "mainframeProcessors": {"z10EC": [{"id": "z", "name": "Z", "year": 2008, "cores": 4, "mips": 3000}]}
    }"#;

    #[test]
    fn embedded_datasets_load() {
        let data = Datasets::embedded().unwrap();
        assert!(!data.processors.is_empty());
        assert_eq!(data.processors.families.len(), 8);
        assert!(data.workloads.find("commercial").is_some());
    }

    #[test]
    fn missing_families_are_empty() {
        let catalog = parse_processors(MINIMAL_PROCESSORS).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.families_of(ProcessorKind::Intel).all(|f| f.processors.is_empty()));
    }

    #[test]
    fn mainframe_without_mips_is_rejected() {
        let json = MINIMAL_PROCESSORS.replace(r#""mips": 3000"#, r#""mipsPerCore": 750"#);
        let err = parse_processors(&json).unwrap_err();
        assert!(matches!(err, DataError::InvalidProcessor { ref id, .. } if id == "z"));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = MINIMAL_PROCESSORS.replace(r#""id": "z""#, r#""id": "p9""#);
        assert!(matches!(parse_processors(&json), Err(DataError::DuplicateProcessor(id)) if id == "p9"));
    }

    #[test]
    fn zero_workload_factor_is_rejected() {
        let json = r#"{
            "workloadTypes": [{"id": "w", "name": "W", "tpmPerMips": 0}],
            "migrationSizing": {"conversionFactors": {"itaniumMipsPerCore": 150, "xeonMipsPerCore": 200}}
        }"#;
        assert!(matches!(parse_workloads(json), Err(DataError::InvalidWorkload { .. })));
    }

    #[test]
    fn malformed_json_reports_document() {
        let err = parse_workloads("{not json").unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse workload data"));
    }
}
