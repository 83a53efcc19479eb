//! Rendering of comparison, quantity and sizing results.
//!
//! Everything here is presentation: summary sentences, score cards, metric
//! bars, the detail table, Chart.js configurations and the plain-text
//! export. Both front ends (terminal and dashboard) consume these values.

use serde::Serialize;
use serde_json::{json, Value};

use crate::compare::{ComparisonResult, Contender, QuantityResult, Verdict};
use crate::migrate::MigrationSizingResult;
use crate::model::{ProcessorKind, ProcessorRecord};

/// Placeholder for fields a processor kind does not have.
pub const NOT_AVAILABLE: &str = "N/A";

/// Bar width caps for absolute metrics.
const CORES_BAR_MAX: f64 = 64.0;
const THREADS_BAR_MAX: f64 = 128.0;
const MIPS_BAR_MAX: f64 = 10_000.0;

/// Use case shown for mainframe records.
const MAINFRAME_USE_CASE: &str = "Enterprise workloads, transaction processing";

// ============================================================================
// Number Formatting
// ============================================================================

/// Group digits with commas: 96000 -> "96,000".
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Round and group a transaction rate.
pub fn format_tpm(tpm: f64) -> String {
    format_number(tpm.round().max(0.0) as u64)
}

/// Format a byte count as bytes, KB or MB.
pub fn format_data_size(size: u64) -> String {
    if size >= 1024 * 1024 {
        format!("{:.2} MB", size as f64 / (1024.0 * 1024.0))
    } else if size >= 1024 {
        format!("{:.2} KB", size as f64 / 1024.0)
    } else {
        format!("{} bytes", size)
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn pct_of(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        (value / max * 100.0).min(100.0)
    } else {
        0.0
    }
}

// ============================================================================
// Comparison Summary
// ============================================================================

/// Headline sentence, the quantity note when there are several units of the
/// first processor, then the core/thread sentence.
pub fn summary_text(result: &ComparisonResult) -> String {
    let mut text = comparison_sentence(result);
    if result.first_quantity > 1 {
        text.push_str(&format!(
            " This comparison is based on {}x {} processors.",
            result.first_quantity, result.first.processor.name
        ));
    }
    format!("{} {}", text, core_thread_sentence(result))
}

fn comparison_sentence(result: &ComparisonResult) -> String {
    let a = &result.first.processor;
    let b = &result.second.processor;
    let ratio = result.equivalence.ratio;

    if result.involves_mainframe() && !result.both_mainframe() {
        let intro = if result.first.kind.is_mainframe() {
            format!(
                "The {} ({} MIPS) is being compared to {} with a multi-thread performance score of {}.",
                a.name,
                a.mips(),
                b.name,
                b.multi_thread()
            )
        } else {
            format!(
                "The {} with a multi-thread performance score of {} is being compared to {} ({} MIPS).",
                a.name,
                a.multi_thread(),
                b.name,
                b.mips()
            )
        };
        return format!(
            "{} Normalized to the {} workload ({} tpm/MIPS), the performance ratio is {:.2} ({}).",
            intro,
            result.workload.name,
            result.workload.tpm_per_mips,
            ratio,
            verdict_phrase(result)
        );
    }

    let domain = if result.both_mainframe() {
        "total MIPS capacity"
    } else {
        "multi-threaded workloads"
    };
    match result.verdict {
        Verdict::FirstStronger => format!(
            "The {} is approximately {:.2}x more powerful than the {} in {}.",
            a.name, ratio, b.name, domain
        ),
        Verdict::SecondStronger => format!(
            "The {} is approximately {:.2}x more powerful than the {} in {}.",
            b.name,
            1.0 / ratio,
            a.name,
            domain
        ),
        Verdict::Comparable => format!(
            "The {} and {} offer comparable performance in {} (ratio: {:.2}).",
            a.name, b.name, domain, ratio
        ),
    }
}

fn verdict_phrase(result: &ComparisonResult) -> String {
    match result.verdict {
        Verdict::FirstStronger => format!("{} stronger", result.first.processor.name),
        Verdict::SecondStronger => format!("{} stronger", result.second.processor.name),
        Verdict::Comparable => "comparable".to_string(),
    }
}

fn core_thread_sentence(result: &ComparisonResult) -> String {
    let describe = |c: &Contender| {
        if c.kind.is_mainframe() {
            format!("{} cores", c.processor.cores)
        } else {
            format!("{} cores and {} threads", c.processor.cores, c.processor.thread_count())
        }
    };
    let verb = if result.involves_mainframe() { "has" } else { "features" };
    format!(
        "The {} {} {}, while the {} has {}.",
        result.first.processor.name,
        verb,
        describe(&result.first),
        result.second.processor.name,
        describe(&result.second)
    )
}

// ============================================================================
// Score Cards and Metric Bars
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    pub kind: ProcessorKind,
    /// Single-letter badge: P, I or M.
    pub badge: char,
    pub value: f64,
    pub label: String,
    pub processor: String,
}

fn badge(kind: ProcessorKind) -> char {
    match kind {
        ProcessorKind::Power => 'P',
        ProcessorKind::Intel => 'I',
        ProcessorKind::Mainframe => 'M',
    }
}

/// Four cards: per-unit rating for both sides, then total rating. The
/// first side's total covers all of its units.
pub fn score_cards(result: &ComparisonResult) -> Vec<ScoreCard> {
    let card = |c: &Contender, total: bool, units: u32| {
        let p = &c.processor;
        let (value, label) = match (c.kind.is_mainframe(), total) {
            (true, false) => (p.mips_per_core.unwrap_or(0.0), "MIPS per Core"),
            (true, true) => (p.mips() * units as f64, "Total MIPS"),
            (false, false) => (p.single_thread(), "Single-Thread Score"),
            (false, true) if units > 1 => (p.multi_thread() * units as f64, "Total Multi-Thread Score"),
            (false, true) => (p.multi_thread(), "Multi-Thread Score"),
        };
        let label = match units {
            1 => label.to_string(),
            n => format!("{} ({}x)", label, n),
        };
        ScoreCard { kind: c.kind, badge: badge(c.kind), value, label, processor: p.name.clone() }
    };

    vec![
        card(&result.first, false, 1),
        card(&result.second, false, 1),
        card(&result.first, true, result.first_quantity),
        card(&result.second, true, 1),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricBar {
    pub kind: ProcessorKind,
    pub processor: String,
    pub value: f64,
    /// Bar width in percent, 0..=100.
    pub width_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricGroup {
    pub title: &'static str,
    pub bars: [MetricBar; 2],
}

/// How a metric relates to the number of units of the first processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scaling {
    PerUnit,
    Total,
}

fn metric_group(
    title: &'static str,
    result: &ComparisonResult,
    value: impl Fn(&ProcessorRecord) -> f64,
    max: Option<f64>,
    scaling: Scaling,
) -> MetricGroup {
    let (units, first_name) = match scaling {
        Scaling::Total => (result.first_quantity as f64, result.first_label()),
        Scaling::PerUnit => (1.0, result.first.processor.name.clone()),
    };
    let a = value(&result.first.processor) * units;
    let b = value(&result.second.processor);
    // Without a fixed cap bars are relative to the larger value
    let max = max.unwrap_or_else(|| a.max(b));
    let bar = |c: &Contender, processor: String, v: f64| MetricBar {
        kind: c.kind,
        processor,
        value: v,
        width_pct: pct_of(v, max),
    };
    MetricGroup {
        title,
        bars: [
            bar(&result.first, first_name, a),
            bar(&result.second, result.second.processor.name.clone(), b),
        ],
    }
}

/// Metric bars; mainframe comparisons only show what both sides have.
pub fn metric_groups(result: &ComparisonResult) -> Vec<MetricGroup> {
    use Scaling::{PerUnit, Total};
    let cores = |p: &ProcessorRecord| p.cores as f64;

    if result.involves_mainframe() {
        let mut groups = vec![metric_group("Cores", result, cores, Some(CORES_BAR_MAX), Total)];
        if result.both_mainframe() {
            groups.push(metric_group("Total MIPS", result, |p| p.mips(), Some(MIPS_BAR_MAX), Total));
        }
        return groups;
    }

    vec![
        metric_group("Single-Thread Performance", result, |p| p.single_thread(), None, PerUnit),
        metric_group("Multi-Thread Performance", result, |p| p.multi_thread(), None, Total),
        metric_group("Cores", result, cores, Some(CORES_BAR_MAX), Total),
        metric_group("Threads", result, |p| p.thread_count() as f64, Some(THREADS_BAR_MAX), Total),
    ]
}

// ============================================================================
// Detail Table
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub label: &'static str,
    pub first: String,
    pub second: String,
}

impl DetailRow {
    fn new(label: &'static str, first: String, second: String) -> Self {
        Self { label, first, second }
    }
}

/// Detail table rows; fields a kind lacks render as "N/A".
pub fn detail_rows(result: &ComparisonResult) -> Vec<DetailRow> {
    let (a, b) = (&result.first, &result.second);
    let any_non_mainframe = !result.both_mainframe();
    let mut rows = Vec::with_capacity(20);

    // Field of a non-mainframe record, N/A for mainframes
    let nm = |c: &Contender, f: &dyn Fn(&ProcessorRecord) -> Option<String>| {
        if c.kind.is_mainframe() {
            NOT_AVAILABLE.to_string()
        } else {
            or_na(f(&c.processor))
        }
    };
    let mf = |c: &Contender, f: &dyn Fn(&ProcessorRecord) -> Option<String>| {
        if c.kind.is_mainframe() {
            or_na(f(&c.processor))
        } else {
            NOT_AVAILABLE.to_string()
        }
    };
    let architecture = |c: &Contender| {
        if c.kind.is_mainframe() {
            "IBM Mainframe".to_string()
        } else {
            c.processor.architecture.clone()
        }
    };

    rows.push(DetailRow::new("Architecture", architecture(a), architecture(b)));
    rows.push(DetailRow::new("Release Year", a.processor.year.to_string(), b.processor.year.to_string()));
    rows.push(DetailRow::new("Cores", a.processor.cores.to_string(), b.processor.cores.to_string()));

    let threads = |p: &ProcessorRecord| p.threads.map(|t| t.to_string());
    let frequency = |p: &ProcessorRecord| p.frequency.map(|f| format!("{} GHz", f));
    let tdp = |p: &ProcessorRecord| p.tdp.map(|w| format!("{} W", w));

    if any_non_mainframe {
        rows.push(DetailRow::new("Threads", nm(a, &threads), nm(b, &threads)));
    }
    rows.push(DetailRow::new("Base Frequency", nm(a, &frequency), nm(b, &frequency)));
    if any_non_mainframe {
        let l1 = |p: &ProcessorRecord| p.l1_cache.clone();
        let l2 = |p: &ProcessorRecord| p.l2_cache.clone();
        let l3 = |p: &ProcessorRecord| p.l3_cache.clone();
        rows.push(DetailRow::new("TDP", nm(a, &tdp), nm(b, &tdp)));
        rows.push(DetailRow::new("L1 Cache", nm(a, &l1), nm(b, &l1)));
        rows.push(DetailRow::new("L2 Cache", nm(a, &l2), nm(b, &l2)));
        rows.push(DetailRow::new("L3 Cache", nm(a, &l3), nm(b, &l3)));
    }

    if result.involves_mainframe() {
        let mips = |p: &ProcessorRecord| p.mips.map(|m| m.to_string());
        let per_core = |p: &ProcessorRecord| p.mips_per_core.map(|m| m.to_string());
        rows.push(DetailRow::new("MIPS Rating", mf(a, &mips), mf(b, &mips)));
        rows.push(DetailRow::new("MIPS per Core", mf(a, &per_core), mf(b, &per_core)));
    }

    if any_non_mainframe {
        let st = |p: &ProcessorRecord| p.single_thread_score.map(|s| s.to_string());
        let mt = |p: &ProcessorRecord| p.multi_thread_score.map(|s| s.to_string());
        let bw = |p: &ProcessorRecord| p.memory_bandwidth.clone();
        rows.push(DetailRow::new("Single-Thread Score", nm(a, &st), nm(b, &st)));
        rows.push(DetailRow::new("Multi-Thread Score", nm(a, &mt), nm(b, &mt)));
        rows.push(DetailRow::new("Memory Bandwidth", nm(a, &bw), nm(b, &bw)));
    }

    let use_case = |c: &Contender| {
        if c.kind.is_mainframe() {
            MAINFRAME_USE_CASE.to_string()
        } else {
            or_na(c.processor.use_case.clone())
        }
    };
    rows.push(DetailRow::new("Typical Use Case", use_case(a), use_case(b)));

    // Cross-vendor labels sit in the column of the processor they describe
    for (c, is_first) in [(a, true), (b, false)] {
        let place = |label: &'static str, value: &str| {
            let (first, second) = if is_first {
                (value.to_string(), NOT_AVAILABLE.to_string())
            } else {
                (NOT_AVAILABLE.to_string(), value.to_string())
            };
            DetailRow::new(label, first, second)
        };
        let p = &c.processor;

        if c.kind.is_mainframe() {
            let na = || NOT_AVAILABLE.to_string();
            rows.push(place(
                "HP Equivalent (Processor Intensive)",
                &p.processor_intensive_equivalent.clone().unwrap_or_else(na),
            ));
            rows.push(place("HP Equivalent (Commercial)", &p.commercial_equivalent.clone().unwrap_or_else(na)));
            rows.push(place(
                "HP Equivalent (Business Intelligence)",
                &p.bi_equivalent.clone().unwrap_or_else(na),
            ));
        } else if let Some(eq) = &p.power_equivalent {
            rows.push(place("Power Equivalent", eq));
        } else if let Some(eq) = &p.intel_equivalent {
            rows.push(place("Intel Equivalent", eq));
        }
    }

    rows
}

// ============================================================================
// Chart Configurations
// ============================================================================

/// Solid and translucent colour for a processor kind.
pub fn kind_colors(kind: ProcessorKind) -> (&'static str, &'static str) {
    match kind {
        ProcessorKind::Power => ("rgba(15, 98, 254, 1)", "rgba(15, 98, 254, 0.2)"),
        ProcessorKind::Intel => ("rgba(0, 113, 197, 1)", "rgba(0, 113, 197, 0.2)"),
        ProcessorKind::Mainframe => ("rgba(102, 51, 153, 1)", "rgba(102, 51, 153, 0.2)"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub background_color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<&'static str>,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// A Chart.js configuration object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: &'static str,
    pub data: ChartData,
    pub options: Value,
}

fn bar_options(title: Option<&str>) -> Value {
    let mut options = json!({
        "responsive": true,
        "maintainAspectRatio": false,
        "scales": { "y": { "beginAtZero": true } }
    });
    if let Some(title) = title {
        options["plugins"] = json!({ "title": { "display": true, "text": title } });
    }
    options
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn solid_dataset(c: &Contender, label: String, data: Vec<f64>) -> ChartDataset {
    ChartDataset {
        label,
        background_color: kind_colors(c.kind).0,
        border_color: None,
        data,
    }
}

/// Radar of workload sub-scores for two non-mainframes, otherwise a bar
/// chart of the ratings both sides share.
pub fn overview_chart(result: &ComparisonResult) -> ChartConfig {
    let (a, b) = (&result.first, &result.second);
    let units = result.first_quantity as f64;

    if !result.involves_mainframe() {
        let radar = |c: &Contender, label: String, units: f64| {
            let p = &c.processor;
            let (solid, translucent) = kind_colors(c.kind);
            // Multi-thread is scaled down to share the 0..200 axis
            let mut data = vec![p.single_thread(), p.multi_thread() * units / 100.0];
            data.extend(p.workload_scores().iter().map(|s| s * units));
            ChartDataset {
                label,
                background_color: translucent,
                border_color: Some(solid),
                data,
            }
        };
        let suggested_max = (a.processor.multi_thread() * units / 100.0).max(200.0);
        return ChartConfig {
            chart_type: "radar",
            data: ChartData {
                labels: labels(&["Single-Thread", "Multi-Thread", "Virtualization", "Database", "AI/ML", "HPC", "General"]),
                datasets: vec![radar(a, result.first_label(), units), radar(b, b.processor.name.clone(), 1.0)],
            },
            options: json!({
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": { "r": { "beginAtZero": true, "suggestedMax": suggested_max } },
                "plugins": { "title": { "display": true, "text": "Performance Comparison by Workload Type" } }
            }),
        };
    }

    let (chart_labels, first_data, second_data) = if result.both_mainframe() {
        (
            ["Total MIPS", "MIPS per Core"],
            vec![a.processor.mips() * units, a.processor.mips_per_core.unwrap_or(0.0)],
            vec![b.processor.mips(), b.processor.mips_per_core.unwrap_or(0.0)],
        )
    } else if a.kind.is_mainframe() {
        (
            ["MIPS / Multi-Thread Score", "Cores"],
            vec![a.processor.mips() * units, a.processor.cores as f64 * units],
            vec![b.processor.multi_thread(), b.processor.cores as f64],
        )
    } else {
        (
            ["Multi-Thread Score / MIPS", "Cores"],
            vec![a.processor.multi_thread() * units, a.processor.cores as f64 * units],
            vec![b.processor.mips(), b.processor.cores as f64],
        )
    };

    ChartConfig {
        chart_type: "bar",
        data: ChartData {
            labels: labels(&chart_labels),
            datasets: vec![
                solid_dataset(a, result.first_label(), first_data),
                solid_dataset(b, b.processor.name.clone(), second_data),
            ],
        },
        options: bar_options(Some("Processor Comparison")),
    }
}

/// Single-thread bars; absent when both processors are mainframes.
pub fn single_thread_chart(result: &ComparisonResult) -> Option<ChartConfig> {
    let datasets: Vec<_> = [&result.first, &result.second]
        .into_iter()
        .filter(|c| !c.kind.is_mainframe())
        .map(|c| solid_dataset(c, c.processor.name.clone(), vec![c.processor.single_thread()]))
        .collect();

    if datasets.is_empty() {
        return None;
    }
    Some(ChartConfig {
        chart_type: "bar",
        data: ChartData { labels: labels(&["Single-Thread Performance"]), datasets },
        options: bar_options(None),
    })
}

/// Multi-thread score / MIPS bars.
pub fn multi_thread_chart(result: &ComparisonResult) -> ChartConfig {
    let (a, b) = (&result.first, &result.second);
    let mixed = result.involves_mainframe() && !result.both_mainframe();

    let label = if result.both_mainframe() {
        "Total MIPS"
    } else if a.kind.is_mainframe() {
        "MIPS vs Multi-Thread Score"
    } else if b.kind.is_mainframe() {
        "Multi-Thread Score vs MIPS"
    } else {
        "Multi-Thread Performance"
    };

    let dataset = |c: &Contender, name: String, units: u32| {
        let name = match (mixed, c.kind.is_mainframe()) {
            (true, true) => format!("{} (MIPS)", name),
            (true, false) => format!("{} (Score)", name),
            _ => name,
        };
        let value = crate::compare::performance(&c.processor, c.kind) * units as f64;
        solid_dataset(c, name, vec![value])
    };
    let datasets = vec![
        dataset(a, result.first_label(), result.first_quantity),
        dataset(b, b.processor.name.clone(), 1),
    ];

    ChartConfig {
        chart_type: "bar",
        data: ChartData { labels: labels(&[label]), datasets },
        options: bar_options(None),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonCharts {
    pub overview: ChartConfig,
    pub single_thread: Option<ChartConfig>,
    pub multi_thread: ChartConfig,
}

// ============================================================================
// Full Comparison Report
// ============================================================================

/// Everything rendered for one comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub result: ComparisonResult,
    pub summary: String,
    pub score_cards: Vec<ScoreCard>,
    pub metrics: Vec<MetricGroup>,
    pub details: Vec<DetailRow>,
    pub charts: ComparisonCharts,
}

impl ComparisonReport {
    pub fn build(result: ComparisonResult) -> Self {
        Self {
            summary: summary_text(&result),
            score_cards: score_cards(&result),
            metrics: metric_groups(&result),
            details: detail_rows(&result),
            charts: ComparisonCharts {
                overview: overview_chart(&result),
                single_thread: single_thread_chart(&result),
                multi_thread: multi_thread_chart(&result),
            },
            result,
        }
    }

    /// Plain-text export of summary and detail table.
    pub fn export_text(&self) -> String {
        let rule = "==============================";
        let mut out = String::new();
        out.push_str("PROCESSOR COMPARISON RESULTS\n");
        out.push_str(rule);
        out.push_str("\n\nSummary:\n");
        out.push_str(&self.summary);
        out.push_str("\n\nDetailed Comparison:\n");
        out.push_str(rule);
        out.push('\n');
        for row in &self.details {
            out.push_str(&format!("{}: {} vs {}\n", row.label, row.first, row.second));
        }
        out.push('\n');
        out.push_str(rule);
        out.push('\n');
        out.push_str("Generated by procsize");
        out
    }
}

/// Suggested file name for the export.
pub const EXPORT_FILE_NAME: &str = "processor-comparison-results.txt";

// ============================================================================
// Quantity and Migration
// ============================================================================

fn rating_label(kind: ProcessorKind) -> &'static str {
    if kind.is_mainframe() {
        "MIPS"
    } else {
        "Multi-Thread Score"
    }
}

/// Per-side totals for a quantity result.
#[derive(Debug, Clone, Serialize)]
pub struct QuantitySide {
    pub name: String,
    pub quantity: u64,
    pub metric: &'static str,
    pub per_unit: f64,
    pub total: f64,
    pub cores_per_unit: u32,
    pub total_cores: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_threads: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuantityReport {
    pub result: QuantityResult,
    pub source: QuantitySide,
    pub target: QuantitySide,
    pub headline: String,
    pub note: String,
    pub chart: ChartConfig,
}

fn quantity_side(c: &Contender, quantity: u64) -> QuantitySide {
    let p = &c.processor;
    let per_unit = crate::compare::performance(p, c.kind);
    QuantitySide {
        name: p.name.clone(),
        quantity,
        metric: rating_label(c.kind),
        per_unit,
        total: per_unit * quantity as f64,
        cores_per_unit: p.cores,
        total_cores: p.cores as u64 * quantity,
        total_threads: (!c.kind.is_mainframe()).then(|| p.thread_count() as u64 * quantity),
    }
}

impl QuantityReport {
    pub fn build(result: QuantityResult) -> Self {
        let eq = result.equivalence;
        let source = quantity_side(&result.source, eq.source_quantity as u64);
        let target = quantity_side(&result.target, eq.target_quantity);

        let headline = format!("{}x {} ≈ {}x {}", source.quantity, source.name, target.quantity, target.name);
        let mut note = "This equivalence is based on the selected workload profile and relative \
                        performance metrics between the two processor types."
            .to_string();
        if result.source.kind.is_mainframe() != result.target.kind.is_mainframe() {
            note.push_str(" Cross-platform comparisons use workload factor adjustments to normalize performance metrics.");
        }

        let dataset = |c: &Contender, side: &QuantitySide| {
            solid_dataset(c, side.name.clone(), vec![side.quantity as f64, side.total_cores as f64, side.total])
        };
        let chart = ChartConfig {
            chart_type: "bar",
            data: ChartData {
                labels: labels(&["Processor Quantity", "Total Cores", "Performance Score"]),
                datasets: vec![dataset(&result.source, &source), dataset(&result.target, &target)],
            },
            options: bar_options(Some(
                format!("Processor Quantity Equivalence ({} Workload)", result.workload.name).as_str(),
            )),
        };

        Self { result, source, target, headline, note, chart }
    }
}

/// Sizing text for one reference platform.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformText {
    pub heading: &'static str,
    pub cores_line: String,
    pub basis_line: String,
}

fn platform_text(result: &MigrationSizingResult, kind: ProcessorKind) -> PlatformText {
    let (heading, short, sizing, reference) = match kind {
        ProcessorKind::Intel => ("Intel x86 Sizing", "Intel", &result.intel, "Xeon"),
        _ => ("IBM POWER Sizing", "IBM POWER", &result.power, "Itanium"),
    };
    PlatformText {
        heading,
        cores_line: format!("Required {} cores: {}", short, format_number(sizing.required_cores)),
        basis_line: format!(
            "Based on a conversion factor of {} MIPS per core for {} processors.",
            sizing.mips_per_core, reference
        ),
    }
}

/// Rendered sizing result.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub result: MigrationSizingResult,
    pub summary: String,
    pub required_tpm_display: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power: Option<PlatformText>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intel: Option<PlatformText>,
    pub chart: ChartConfig,
}

impl MigrationReport {
    pub fn build(result: MigrationSizingResult) -> Self {
        let summary = format!(
            "For a mainframe workload of {} MIPS at {}% utilization, with a {} workload type \
             ({} tpm/MIPS), the migration sizing results are:",
            result.source_mips, result.utilization_pct, result.workload_name, result.workload_factor
        );
        let required_tpm_display = format_tpm(result.required_tpm);

        let effective_mips = result.source_mips as f64 * result.utilization_pct as f64 / 100.0;
        let mut datasets = Vec::with_capacity(2);
        if result.shows_power() {
            datasets.push(ChartDataset {
                label: "IBM POWER".to_string(),
                background_color: "rgba(15, 98, 254, 0.7)",
                border_color: None,
                data: vec![effective_mips, result.power.required_cores as f64],
            });
        }
        if result.shows_intel() {
            datasets.push(ChartDataset {
                label: "Intel x86".to_string(),
                background_color: "rgba(0, 113, 197, 0.7)",
                border_color: None,
                data: vec![effective_mips, result.intel.required_cores as f64],
            });
        }
        let chart = ChartConfig {
            chart_type: "bar",
            data: ChartData { labels: labels(&["MIPS", "Required Cores"]), datasets },
            options: bar_options(Some("Mainframe Migration Sizing")),
        };

        let power = result.shows_power().then(|| platform_text(&result, ProcessorKind::Power));
        let intel = result.shows_intel().then(|| platform_text(&result, ProcessorKind::Intel));

        Self { result, summary, required_tpm_display, power, intel, chart }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_grouping() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(96000), "96,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_tpm(95999.6), "96,000");
    }

    #[test]
    fn data_size_units() {
        assert_eq!(format_data_size(512), "512 bytes");
        assert_eq!(format_data_size(2048), "2.00 KB");
        assert_eq!(format_data_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn bar_width_is_capped() {
        assert_eq!(pct_of(200.0, 64.0), 100.0);
        assert_eq!(pct_of(32.0, 64.0), 50.0);
        assert_eq!(pct_of(5.0, 0.0), 0.0);
    }
}
