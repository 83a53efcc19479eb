//! Mainframe migration sizing.
//!
//! Converts a source mainframe capacity into the transaction rate it must
//! sustain and the number of cores needed on two reference architectures:
//!
//! ```text
//! required_tpm   = mips * factor * util / 100
//! required_cores = ceil(mips * util / 100 / mips_per_core)
//! ```
//!
//! The workload factor is either looked up by workload id or blended from
//! five fixed category factors weighted by user percentages that must total
//! exactly 100.

use serde::Serialize;
use tracing::debug;

use crate::error::SizingError;
use crate::model::{ConversionFactors, WorkloadData};

/// Category factors (tpm/MIPS) for a custom blend, in [`WorkloadMix`] order.
pub const CATEGORY_FACTORS: [f64; 5] = [30.0, 75.0, 120.0, 160.0, 200.0];

/// Selector value for the custom blend.
pub const CUSTOM_WORKLOAD_ID: &str = "custom";

/// Percentages of a custom workload blend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorkloadMix {
    pub processor_intensive: u32,
    pub tpc_c: u32,
    pub commercial: u32,
    pub mixed: u32,
    pub business_intelligence: u32,
}

impl WorkloadMix {
    pub fn as_array(&self) -> [u32; 5] {
        [
            self.processor_intensive,
            self.tpc_c,
            self.commercial,
            self.mixed,
            self.business_intelligence,
        ]
    }

    /// Sum of the shares; wide enough that no `u32` inputs can wrap to 100.
    pub fn total(&self) -> u64 {
        self.as_array().iter().map(|&pct| u64::from(pct)).sum()
    }

    /// Running total as shown next to the blend inputs.
    pub fn total_label(&self) -> String {
        format!("Total: {}%", self.total())
    }

    pub fn is_complete(&self) -> bool {
        self.total() == 100
    }

    /// Blended tpm/MIPS factor; the percentages must total 100.
    pub fn factor(&self) -> Result<f64, SizingError> {
        if !self.is_complete() {
            return Err(SizingError::MixNotHundred { total: self.total() });
        }

        let weighted: f64 = self
            .as_array()
            .iter()
            .zip(CATEGORY_FACTORS.iter())
            .map(|(&pct, &factor)| pct as f64 * factor)
            .sum();
        Ok(weighted / 100.0)
    }
}

/// Where the workload factor comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkloadChoice {
    Named(String),
    Custom(WorkloadMix),
}

impl WorkloadChoice {
    /// Build from a selector value; `custom` takes the given mix.
    pub fn from_selector(value: &str, mix: WorkloadMix) -> Option<Self> {
        match value.trim() {
            "" => None,
            CUSTOM_WORKLOAD_ID => Some(Self::Custom(mix)),
            id => Some(Self::Named(id.to_string())),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Named(id) => id,
            Self::Custom(_) => CUSTOM_WORKLOAD_ID,
        }
    }
}

/// Which reference platform results to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPlatform {
    Power,
    Intel,
    Both,
}

impl TargetPlatform {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "power" => Some(Self::Power),
            "intel" | "x86" => Some(Self::Intel),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn includes_power(&self) -> bool {
        matches!(self, Self::Power | Self::Both)
    }

    pub fn includes_intel(&self) -> bool {
        matches!(self, Self::Intel | Self::Both)
    }
}

// ============================================================================
// Request Validation
// ============================================================================

/// Sizing inputs after parsing, before workload resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationRequest {
    pub source_mips: u64,
    /// Utilization percentage, 1..=100.
    pub utilization_pct: u32,
    pub workload: WorkloadChoice,
    pub target: TargetPlatform,
}

/// Raw form values, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct MigrationForm {
    pub source_mips: String,
    pub utilization: String,
    pub workload: String,
    pub target: String,
    pub mix: WorkloadMix,
}

/// Parse an integer field the way a form input is read: surrounding
/// whitespace is ignored, anything non-numeric is rejected.
fn parse_int(field: &str) -> Option<i64> {
    field.trim().parse::<i64>().ok()
}

impl MigrationForm {
    /// Validate in order: MIPS, utilization, workload, target platform.
    /// The blend total is checked when the factor is resolved.
    pub fn validate(&self) -> Result<MigrationRequest, SizingError> {
        let source_mips = parse_int(&self.source_mips)
            .filter(|&m| m > 0)
            .ok_or(SizingError::InvalidMips)? as u64;

        let utilization_pct = parse_int(&self.utilization)
            .filter(|u| (1..=100).contains(u))
            .ok_or(SizingError::InvalidUtilization)? as u32;

        let workload =
            WorkloadChoice::from_selector(&self.workload, self.mix).ok_or(SizingError::NoWorkload)?;

        let target = TargetPlatform::from_str(&self.target).ok_or(SizingError::NoTargetPlatform)?;

        Ok(MigrationRequest { source_mips, utilization_pct, workload, target })
    }
}

// ============================================================================
// Sizing
// ============================================================================

/// Transactions per minute the target must sustain.
#[inline]
pub fn required_tpm(source_mips: f64, workload_factor: f64, utilization_pct: f64) -> f64 {
    source_mips * workload_factor * (utilization_pct / 100.0)
}

/// Cores needed on a reference architecture, rounded up.
#[inline]
pub fn required_cores(source_mips: f64, utilization_pct: f64, mips_per_core: f64) -> u64 {
    (source_mips * (utilization_pct / 100.0) / mips_per_core).ceil() as u64
}

/// Sizing outcome for one reference platform.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformSizing {
    pub required_cores: u64,
    pub mips_per_core: f64,
    pub recommendation: &'static [&'static str],
    pub advantages: &'static [&'static str],
}

/// Complete sizing result.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationSizingResult {
    pub source_mips: u64,
    pub utilization_pct: u32,
    pub workload_id: String,
    pub workload_name: String,
    pub workload_factor: f64,
    pub required_tpm: f64,
    pub target: TargetPlatform,
    /// Itanium-class reference, reported as the POWER target.
    pub power: PlatformSizing,
    /// Xeon-class reference, reported as the Intel target.
    pub intel: PlatformSizing,
}

impl MigrationSizingResult {
    pub fn shows_power(&self) -> bool {
        self.target.includes_power()
    }

    pub fn shows_intel(&self) -> bool {
        self.target.includes_intel()
    }
}

/// Resolve the workload factor for a request.
pub fn resolve_factor(workloads: &WorkloadData, choice: &WorkloadChoice) -> Result<(f64, String), SizingError> {
    match choice {
        WorkloadChoice::Custom(mix) => Ok((mix.factor()?, "Custom Workload Mix".to_string())),
        WorkloadChoice::Named(id) => workloads
            .find(id)
            .map(|w| (w.tpm_per_mips, w.name.clone()))
            .ok_or(SizingError::UnknownWorkload),
    }
}

/// Size a validated request.
pub fn size(
    workloads: &WorkloadData,
    request: &MigrationRequest,
) -> Result<MigrationSizingResult, SizingError> {
    let (workload_factor, workload_name) = resolve_factor(workloads, &request.workload)?;
    let factors: ConversionFactors = workloads.conversion_factors();

    let mips = request.source_mips as f64;
    let util = request.utilization_pct as f64;
    let workload_id = request.workload.id().to_string();

    let power_cores = required_cores(mips, util, factors.itanium_mips_per_core);
    let intel_cores = required_cores(mips, util, factors.xeon_mips_per_core);

    debug!(
        mips = request.source_mips,
        util = request.utilization_pct,
        factor = workload_factor,
        power_cores,
        intel_cores,
        "migration sized"
    );

    Ok(MigrationSizingResult {
        source_mips: request.source_mips,
        utilization_pct: request.utilization_pct,
        workload_factor,
        required_tpm: required_tpm(mips, workload_factor, util),
        target: request.target,
        power: PlatformSizing {
            required_cores: power_cores,
            mips_per_core: factors.itanium_mips_per_core,
            recommendation: power_recommendation(power_cores),
            advantages: power_advantages(&workload_id),
        },
        intel: PlatformSizing {
            required_cores: intel_cores,
            mips_per_core: factors.xeon_mips_per_core,
            recommendation: intel_recommendation(intel_cores),
            advantages: intel_advantages(&workload_id),
        },
        workload_id,
        workload_name,
    })
}

/// Validate form values and size them.
pub fn size_form(workloads: &WorkloadData, form: &MigrationForm) -> Result<MigrationSizingResult, SizingError> {
    let request = form.validate()?;
    size(workloads, &request)
}

// ============================================================================
// Recommendations
// ============================================================================

/// Suggested POWER configuration for a core count.
pub fn power_recommendation(cores: u64) -> &'static [&'static str] {
    match cores {
        0..=4 => &[
            "IBM Power S1022 (2-socket, 2-core per socket)",
            "PowerVM for virtualization",
            "16 GB RAM per core recommended",
        ],
        5..=16 => &[
            "IBM Power S1024 (2-socket, 8-core per socket)",
            "PowerVM for virtualization",
            "16-32 GB RAM per core recommended",
        ],
        17..=32 => &[
            "IBM Power E1050 (4-socket, 8-core per socket)",
            "PowerVM for virtualization",
            "32 GB RAM per core recommended",
        ],
        _ => &[
            "IBM Power E1080 (4-socket or higher, multiple systems if needed)",
            "PowerVM for virtualization",
            "32-64 GB RAM per core recommended",
            "Consider a multi-system implementation for high availability",
        ],
    }
}

/// Suggested Intel configuration for a core count.
pub fn intel_recommendation(cores: u64) -> &'static [&'static str] {
    const HYPERVISORS: &str = "VMware vSphere or Microsoft Hyper-V for virtualization";
    match cores {
        0..=8 => &[
            "Dell PowerEdge R650 or HPE ProLiant DL360 (2-socket, 4-core per socket)",
            HYPERVISORS,
            "16 GB RAM per core recommended",
        ],
        9..=32 => &[
            "Dell PowerEdge R750 or HPE ProLiant DL380 (2-socket, 16-core per socket)",
            HYPERVISORS,
            "16-32 GB RAM per core recommended",
        ],
        33..=64 => &[
            "Dell PowerEdge R760 or HPE ProLiant DL580 (4-socket, 16-core per socket)",
            HYPERVISORS,
            "32 GB RAM per core recommended",
        ],
        _ => &[
            "Multiple Dell PowerEdge R760 or HPE ProLiant DL580 servers (4-socket, 16-core per socket)",
            HYPERVISORS,
            "32-64 GB RAM per core recommended",
            "Consider a clustered implementation for high availability",
        ],
    }
}

/// POWER strengths for a workload id.
pub fn power_advantages(workload_id: &str) -> &'static [&'static str] {
    match workload_id {
        "processor-intensive" => &[
            "SMT-8 technology for efficient thread processing",
            "High per-core performance",
            "Excellent scaling for compute-intensive tasks",
            "Optimized for scientific and technical workloads",
        ],
        "tpc-c" | "commercial" => &[
            "Excellent transaction processing performance",
            "High memory bandwidth for database operations",
            "Built-in RAS features for high availability",
            "PowerVM for secure workload isolation",
            "Mainframe-inspired virtualization capabilities",
        ],
        "mixed" => &[
            "Balanced design for mixed workloads",
            "Good batch and online transaction processing",
            "Advanced workload management features",
            "Shared processor pools for efficient resource utilization",
        ],
        "business-intelligence" => &[
            "High memory bandwidth for data analytics",
            "Matrix Math Accelerator for AI operations",
            "Excellent I/O throughput for data-intensive operations",
            "Strong scaling for large data warehousing workloads",
        ],
        _ => &[
            "High performance across a wide range of workloads",
            "Advanced virtualization with PowerVM",
            "Strong RAS features for enterprise workloads",
            "Optimized for critical business applications",
        ],
    }
}

/// Intel x86 strengths for a workload id.
pub fn intel_advantages(workload_id: &str) -> &'static [&'static str] {
    match workload_id {
        "processor-intensive" => &[
            "Cost-effective compute capacity",
            "Broad software ecosystem optimized for x86",
            "Wide range of server options from multiple vendors",
            "Extensive developer tools and libraries",
        ],
        "tpc-c" | "commercial" => &[
            "Good performance for commercial applications",
            "Lower acquisition cost than POWER or mainframe",
            "Extensive enterprise software support",
            "Multiple virtualization options (VMware, Hyper-V, KVM)",
        ],
        "mixed" => &[
            "Balanced performance for varied workloads",
            "Extensive software ecosystem",
            "Good scalability options from small to large systems",
            "Familiar management tools and interfaces",
        ],
        "business-intelligence" => &[
            "Cost-effective platform for data analytics",
            "AVX-512 and other SIMD instructions for analytics",
            "Extensive BI tool support",
            "Wide range of storage options for data warehousing",
        ],
        _ => &[
            "Cost-effective platform for general workloads",
            "Extensive software ecosystem",
            "Multiple vendor options",
            "Familiar management and administration",
            "Good performance across most workload types",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(mips: &str, util: &str, workload: &str, target: &str) -> MigrationForm {
        MigrationForm {
            source_mips: mips.into(),
            utilization: util.into(),
            workload: workload.into(),
            target: target.into(),
            mix: WorkloadMix::default(),
        }
    }

    #[test]
    fn validation_order() {
        assert_eq!(form("", "", "", "").validate(), Err(SizingError::InvalidMips));
        assert_eq!(form("abc", "50", "mixed", "both").validate(), Err(SizingError::InvalidMips));
        assert_eq!(form("-5", "50", "mixed", "both").validate(), Err(SizingError::InvalidMips));
        assert_eq!(form("1000", "0", "mixed", "both").validate(), Err(SizingError::InvalidUtilization));
        assert_eq!(form("1000", "101", "mixed", "both").validate(), Err(SizingError::InvalidUtilization));
        assert_eq!(form("1000", "80", "", "both").validate(), Err(SizingError::NoWorkload));
        assert_eq!(form("1000", "80", "mixed", "").validate(), Err(SizingError::NoTargetPlatform));
    }

    #[test]
    fn utilization_bounds_are_inclusive() {
        assert!(form("1000", "1", "mixed", "power").validate().is_ok());
        assert!(form("1000", "100", "mixed", "power").validate().is_ok());
    }

    #[test]
    fn single_category_mix_matches_constant() {
        let mix = WorkloadMix { commercial: 100, ..Default::default() };
        assert_eq!(mix.factor(), Ok(120.0));

        let mix = WorkloadMix { processor_intensive: 50, business_intelligence: 50, ..Default::default() };
        assert_eq!(mix.factor(), Ok(115.0));
    }

    #[test]
    fn incomplete_mix_is_rejected() {
        let mix = WorkloadMix { tpc_c: 60, mixed: 30, ..Default::default() };
        assert_eq!(mix.factor(), Err(SizingError::MixNotHundred { total: 90 }));
        assert_eq!(mix.total_label(), "Total: 90%");
        assert!(!mix.is_complete());
    }

    #[test]
    fn recommendation_tiers() {
        assert!(power_recommendation(4)[0].contains("S1022"));
        assert!(power_recommendation(5)[0].contains("S1024"));
        assert!(power_recommendation(32)[0].contains("E1050"));
        assert!(power_recommendation(33)[0].contains("E1080"));
        assert!(intel_recommendation(8)[0].contains("R650"));
        assert!(intel_recommendation(64)[0].contains("R760"));
        assert!(intel_recommendation(65)[0].starts_with("Multiple"));
    }

    #[test]
    fn tpc_c_and_commercial_share_advantages() {
        assert_eq!(power_advantages("tpc-c"), power_advantages("commercial"));
        assert_eq!(intel_advantages("custom"), intel_advantages("unknown"));
    }
}
