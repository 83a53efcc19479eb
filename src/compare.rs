//! Cross-architecture performance comparison.
//!
//! Mainframes are rated in MIPS, everything else by a multi-thread benchmark
//! score. When one side of a comparison is a mainframe and the other is not,
//! the MIPS rating is scaled by `workload_factor / 120` first, 120 tpm/MIPS
//! being the commercial reference workload.
//!
//! ```text
//! ratio = perf(A) / perf(B)
//!   > 1.2  -> A stronger
//!   < 0.8  -> B stronger
//!   else   -> comparable
//! ```

use serde::Serialize;
use tracing::debug;

use crate::data::Datasets;
use crate::error::SelectionError;
use crate::model::{ProcessorKind, ProcessorRecord, WorkloadType};

/// Reference commercial workload factor (tpm/MIPS) used for normalization.
pub const REFERENCE_TPM_PER_MIPS: f64 = 120.0;

/// Ratio above which the first processor is reported as stronger.
pub const STRONGER_THRESHOLD: f64 = 1.2;

/// Ratio below which the second processor is reported as stronger.
pub const WEAKER_THRESHOLD: f64 = 0.8;

/// Raw performance rating of a processor: MIPS for mainframes,
/// multi-thread score otherwise.
#[inline]
pub fn performance(processor: &ProcessorRecord, kind: ProcessorKind) -> f64 {
    if kind.is_mainframe() {
        processor.mips()
    } else {
        processor.multi_thread()
    }
}

/// Performance of both sides after workload normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Equivalence {
    pub first_performance: f64,
    pub second_performance: f64,
    pub ratio: f64,
}

/// Normalized performance values and their ratio.
///
/// Only mixed comparisons (exactly one mainframe) are normalized; two
/// mainframes or two non-mainframes compare raw ratings.
pub fn workload_equivalence(
    first: &ProcessorRecord,
    first_kind: ProcessorKind,
    second: &ProcessorRecord,
    second_kind: ProcessorKind,
    workload_factor: f64,
) -> Equivalence {
    let (first_performance, second_performance) =
        normalized_pair(first, first_kind, second, second_kind, workload_factor);

    Equivalence {
        first_performance,
        second_performance,
        ratio: first_performance / second_performance,
    }
}

fn normalized_pair(
    first: &ProcessorRecord,
    first_kind: ProcessorKind,
    second: &ProcessorRecord,
    second_kind: ProcessorKind,
    workload_factor: f64,
) -> (f64, f64) {
    let scale = workload_factor / REFERENCE_TPM_PER_MIPS;
    let mut a = performance(first, first_kind);
    let mut b = performance(second, second_kind);

    match (first_kind.is_mainframe(), second_kind.is_mainframe()) {
        (true, false) => a = first.mips() * scale,
        (false, true) => b = second.mips() * scale,
        _ => {}
    }

    (a, b)
}

/// Classification of a performance ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    FirstStronger,
    SecondStronger,
    Comparable,
}

impl Verdict {
    pub fn classify(ratio: f64) -> Self {
        if ratio > STRONGER_THRESHOLD {
            Self::FirstStronger
        } else if ratio < WEAKER_THRESHOLD {
            Self::SecondStronger
        } else {
            Self::Comparable
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstStronger => "first-stronger",
            Self::SecondStronger => "second-stronger",
            Self::Comparable => "comparable",
        }
    }
}

// ============================================================================
// Comparison Modes
// ============================================================================

/// Which pair of architectures the user is comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonMode {
    PowerIntel,
    PowerMainframe,
    IntelMainframe,
    All,
}

impl ComparisonMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "power-intel" => Some(Self::PowerIntel),
            "power-mainframe" => Some(Self::PowerMainframe),
            "intel-mainframe" => Some(Self::IntelMainframe),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::PowerIntel => "power-intel",
            Self::PowerMainframe => "power-mainframe",
            Self::IntelMainframe => "intel-mainframe",
            Self::All => "all",
        }
    }

    /// Selectors visible in this mode.
    pub fn visible_kinds(&self) -> &'static [ProcessorKind] {
        match self {
            Self::PowerIntel => &[ProcessorKind::Power, ProcessorKind::Intel],
            Self::PowerMainframe => &[ProcessorKind::Power, ProcessorKind::Mainframe],
            Self::IntelMainframe => &[ProcessorKind::Intel, ProcessorKind::Mainframe],
            Self::All => &ProcessorKind::ALL,
        }
    }
}

/// Selector values as entered; empty strings count as "not selected".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub mode: Option<ComparisonMode>,
    pub power: Option<String>,
    pub intel: Option<String>,
    pub mainframe: Option<String>,
    pub workload: Option<String>,
    /// Units of the first processor; missing or zero means one.
    pub quantity: Option<u32>,
}

fn selected(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Selection {
    fn id_for(&self, kind: ProcessorKind) -> Option<&str> {
        match kind {
            ProcessorKind::Power => selected(&self.power),
            ProcessorKind::Intel => selected(&self.intel),
            ProcessorKind::Mainframe => selected(&self.mainframe),
        }
    }

    fn require(&self, kind: ProcessorKind) -> Result<(ProcessorKind, &str), SelectionError> {
        self.id_for(kind).map(|id| (kind, id)).ok_or(match kind {
            ProcessorKind::Power => SelectionError::NoPowerProcessor,
            ProcessorKind::Intel => SelectionError::NoIntelProcessor,
            ProcessorKind::Mainframe => SelectionError::NoMainframeProcessor,
        })
    }

    /// The two (kind, id) pairs to compare, in display order.
    pub fn resolve_pair(&self) -> Result<[(ProcessorKind, &str); 2], SelectionError> {
        use ProcessorKind::{Intel, Mainframe, Power};

        let mode = self.mode.ok_or(SelectionError::NoMode)?;
        match mode {
            ComparisonMode::PowerIntel => Ok([self.require(Power)?, self.require(Intel)?]),
            ComparisonMode::PowerMainframe => Ok([self.require(Power)?, self.require(Mainframe)?]),
            ComparisonMode::IntelMainframe => Ok([self.require(Intel)?, self.require(Mainframe)?]),
            ComparisonMode::All => {
                // First complete pair wins
                let candidates = [(Power, Intel), (Power, Mainframe), (Intel, Mainframe)];
                candidates
                    .iter()
                    .find_map(|&(a, b)| Some([(a, self.id_for(a)?), (b, self.id_for(b)?)]))
                    .ok_or(SelectionError::NotEnoughProcessors)
            }
        }
    }

    pub fn workload_id(&self) -> Option<&str> {
        selected(&self.workload)
    }

    pub fn first_quantity(&self) -> u32 {
        self.quantity.filter(|&q| q > 0).unwrap_or(1)
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// One side of a comparison.
#[derive(Debug, Clone, Serialize)]
pub struct Contender {
    pub kind: ProcessorKind,
    pub processor: ProcessorRecord,
}

/// A fully evaluated comparison between two processors.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    pub first: Contender,
    pub second: Contender,
    pub workload: WorkloadType,
    pub equivalence: Equivalence,
    pub verdict: Verdict,
    /// Units of the first processor behind its totals. The ratio and
    /// verdict stay per unit.
    pub first_quantity: u32,
}

impl ComparisonResult {
    /// Build a result from two records and a workload.
    pub fn evaluate(
        first: Contender,
        second: Contender,
        workload: WorkloadType,
    ) -> Result<Self, SelectionError> {
        let equivalence = workload_equivalence(
            &first.processor,
            first.kind,
            &second.processor,
            second.kind,
            workload.tpm_per_mips,
        );
        if !(equivalence.ratio.is_finite()) {
            return Err(SelectionError::ZeroPerformance);
        }
        let verdict = Verdict::classify(equivalence.ratio);

        Ok(Self { first, second, workload, equivalence, verdict, first_quantity: 1 })
    }

    /// Scale the first side's totals to `quantity` units (zero means one).
    pub fn with_first_quantity(mut self, quantity: u32) -> Self {
        self.first_quantity = quantity.max(1);
        self
    }

    /// First processor name, suffixed with "(Nx)" when more than one unit.
    pub fn first_label(&self) -> String {
        match self.first_quantity {
            1 => self.first.processor.name.clone(),
            n => format!("{} ({}x)", self.first.processor.name, n),
        }
    }

    pub fn involves_mainframe(&self) -> bool {
        self.first.kind.is_mainframe() || self.second.kind.is_mainframe()
    }

    pub fn both_mainframe(&self) -> bool {
        self.first.kind.is_mainframe() && self.second.kind.is_mainframe()
    }
}

/// Resolve a selection against the datasets and compare the pair.
pub fn compare(data: &Datasets, selection: &Selection) -> Result<ComparisonResult, SelectionError> {
    if selection.mode.is_none() {
        return Err(SelectionError::NoMode);
    }
    let workload_id = selection.workload_id().ok_or(SelectionError::NoWorkload)?;
    let [(first_kind, first_id), (second_kind, second_id)] = selection.resolve_pair()?;

    let lookup = |kind: ProcessorKind, id: &str| {
        data.processors
            .find(id, kind)
            .cloned()
            .map(|processor| Contender { kind, processor })
            .ok_or(SelectionError::UnknownProcessor)
    };
    let first = lookup(first_kind, first_id)?;
    let second = lookup(second_kind, second_id)?;

    let workload = data
        .workloads
        .find(workload_id)
        .cloned()
        .ok_or(SelectionError::UnknownWorkload)?;

    let result = ComparisonResult::evaluate(first, second, workload)?.with_first_quantity(selection.first_quantity());
    debug!(
        first = %result.first.processor.id,
        second = %result.second.processor.id,
        quantity = result.first_quantity,
        ratio = result.equivalence.ratio,
        verdict = result.verdict.name(),
        "comparison evaluated"
    );
    Ok(result)
}

// ============================================================================
// Quantity Equivalence
// ============================================================================

/// How many target processors match a number of source processors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantityEquivalence {
    pub source_performance: f64,
    pub target_performance: f64,
    pub total_source_performance: f64,
    pub source_quantity: u32,
    pub target_quantity: u64,
}

/// Required target quantity, rounded up to whole processors.
pub fn quantity_equivalence(
    source: &ProcessorRecord,
    source_kind: ProcessorKind,
    target: &ProcessorRecord,
    target_kind: ProcessorKind,
    workload_factor: f64,
    source_quantity: u32,
) -> Result<QuantityEquivalence, SelectionError> {
    let (source_performance, target_performance) =
        normalized_pair(source, source_kind, target, target_kind, workload_factor);
    if !(target_performance.is_finite() && target_performance > 0.0) {
        return Err(SelectionError::ZeroPerformance);
    }

    let total_source_performance = source_performance * source_quantity as f64;
    let target_quantity = (total_source_performance / target_performance).ceil() as u64;

    Ok(QuantityEquivalence {
        source_performance,
        target_performance,
        total_source_performance,
        source_quantity,
        target_quantity,
    })
}

/// Inputs of a quantity calculation as entered.
#[derive(Debug, Clone, Default)]
pub struct QuantityRequest {
    pub source_kind: Option<ProcessorKind>,
    pub source_id: Option<String>,
    pub target_kind: Option<ProcessorKind>,
    pub target_id: Option<String>,
    /// Missing or zero falls back to one processor.
    pub source_quantity: Option<u32>,
    pub workload: Option<String>,
}

/// A resolved quantity calculation, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct QuantityResult {
    pub source: Contender,
    pub target: Contender,
    pub workload: WorkloadType,
    pub equivalence: QuantityEquivalence,
}

/// Validate a quantity request and compute the equivalence.
pub fn quantity(data: &Datasets, request: &QuantityRequest) -> Result<QuantityResult, SelectionError> {
    let source_id = selected(&request.source_id);
    let target_id = selected(&request.target_id);

    let (source_kind, source_id) = request
        .source_kind
        .zip(source_id)
        .ok_or(SelectionError::NoSourceProcessor)?;
    let (target_kind, target_id) = request
        .target_kind
        .zip(target_id)
        .ok_or(SelectionError::NoTargetProcessor)?;
    let workload_id = selected(&request.workload).ok_or(SelectionError::NoWorkload)?;

    let source = data
        .processors
        .find(source_id, source_kind)
        .ok_or(SelectionError::UnknownProcessor)?;
    let target = data
        .processors
        .find(target_id, target_kind)
        .ok_or(SelectionError::UnknownProcessor)?;
    let workload = data
        .workloads
        .find(workload_id)
        .ok_or(SelectionError::UnknownWorkload)?;

    let source_quantity = request.source_quantity.filter(|&q| q > 0).unwrap_or(1);
    let equivalence = quantity_equivalence(
        source,
        source_kind,
        target,
        target_kind,
        workload.tpm_per_mips,
        source_quantity,
    )?;

    Ok(QuantityResult {
        source: Contender { kind: source_kind, processor: source.clone() },
        target: Contender { kind: target_kind, processor: target.clone() },
        workload: workload.clone(),
        equivalence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cpu(multi: f64) -> ProcessorRecord {
        serde_json::from_value(serde_json::json!({
            "id": format!("cpu-{multi}"), "name": "cpu", "year": 2020, "cores": 16,
            "threads": 32, "multiThreadScore": multi
        }))
        .unwrap()
    }

    fn mainframe(mips: f64) -> ProcessorRecord {
        serde_json::from_value(serde_json::json!({
            "id": format!("z-{mips}"), "name": "z", "year": 2008, "cores": 8,
            "mips": mips, "mipsPerCore": mips / 8.0
        }))
        .unwrap()
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(Verdict::classify(1.2), Verdict::Comparable);
        assert_eq!(Verdict::classify(1.2001), Verdict::FirstStronger);
        assert_eq!(Verdict::classify(0.8), Verdict::Comparable);
        assert_eq!(Verdict::classify(0.7999), Verdict::SecondStronger);
        assert_eq!(Verdict::classify(1.0), Verdict::Comparable);
    }

    #[test]
    fn non_mainframe_ratio_is_raw() {
        let eq = workload_equivalence(&cpu(6000.0), ProcessorKind::Power, &cpu(3000.0), ProcessorKind::Intel, 30.0);
        assert_eq!(eq.ratio, 2.0);
    }

    #[test]
    fn mainframe_is_normalized_against_non_mainframe() {
        // 2400 MIPS at 60 tpm/MIPS -> 1200 effective
        let eq = workload_equivalence(&mainframe(2400.0), ProcessorKind::Mainframe, &cpu(1200.0), ProcessorKind::Intel, 60.0);
        assert_eq!(eq.first_performance, 1200.0);
        assert_eq!(eq.ratio, 1.0);

        let eq = workload_equivalence(&cpu(1200.0), ProcessorKind::Power, &mainframe(2400.0), ProcessorKind::Mainframe, 60.0);
        assert_eq!(eq.second_performance, 1200.0);
    }

    #[test]
    fn two_mainframes_are_not_normalized() {
        let eq = workload_equivalence(&mainframe(3000.0), ProcessorKind::Mainframe, &mainframe(1000.0), ProcessorKind::Mainframe, 30.0);
        assert_eq!(eq.ratio, 3.0);
    }

    #[test]
    fn all_mode_picks_first_complete_pair() {
        let sel = Selection {
            mode: Some(ComparisonMode::All),
            intel: Some("i".into()),
            mainframe: Some("m".into()),
            ..Default::default()
        };
        let pair = sel.resolve_pair().unwrap();
        assert_eq!(pair, [(ProcessorKind::Intel, "i"), (ProcessorKind::Mainframe, "m")]);

        let sel = Selection { mode: Some(ComparisonMode::All), power: Some("p".into()), ..Default::default() };
        assert_eq!(sel.resolve_pair(), Err(SelectionError::NotEnoughProcessors));
    }

    #[test]
    fn explicit_mode_reports_missing_side() {
        let sel = Selection {
            mode: Some(ComparisonMode::PowerIntel),
            power: Some("p".into()),
            intel: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(sel.resolve_pair(), Err(SelectionError::NoIntelProcessor));
    }

    #[test]
    fn quantity_rounds_up() {
        let q = quantity_equivalence(&cpu(1000.0), ProcessorKind::Intel, &cpu(300.0), ProcessorKind::Power, 120.0, 2).unwrap();
        assert_eq!(q.total_source_performance, 2000.0);
        assert_eq!(q.target_quantity, 7);
    }
}
