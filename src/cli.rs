//! Command-line interface for the processor comparison and sizing tool.
//!
//! Parameters are organized into categories:
//!
//! ## Data Sources
//! - `--processor-data`, `--workload-data`: JSON datasets (embedded copies
//!   are used when omitted)
//! - `--prefs-file`: where the preferred workload type is stored
//!
//! ## Comparison
//! - `--mode`: power-intel, power-mainframe, intel-mainframe or all
//! - `--power`, `--intel`, `--mainframe`: processor ids per selector
//! - `--workload`: workload type (falls back to the saved preference)
//! - `--processor-quantity`: units of the first processor behind its totals
//!
//! ## Quantity Equivalence
//! - `--source-type` / `--source`, `--target-type` / `--target`
//! - `--source-quantity`: number of source processors (default 1)
//!
//! ## Migration Sizing
//! - `--mips`, `--utilization`: mainframe capacity and its busy share
//! - `--migration-workload`: workload id or `custom` (uses `--mix-*`)
//! - `--target-platform`: power, intel or both
//!
//! ## Modes
//! `--list` (default), `--compare`, `--quantity`, `--migrate`, `--serve`

use std::path::PathBuf;

use clap::Parser;

use crate::compare::{ComparisonMode, QuantityRequest, Selection};
use crate::migrate::{MigrationForm, WorkloadMix};
use crate::model::ProcessorKind;
use crate::prefs::DEFAULT_PREFS_FILE;

#[derive(Parser, Debug)]
#[command(name = "procsize")]
#[command(author, version, about = "Compare POWER, Intel and mainframe processors and size mainframe migrations")]
pub struct Cli {
    // =========================================================================
    // Data Sources
    // =========================================================================

    /// Processor dataset (JSON); the bundled dataset is used when omitted
    #[arg(long, help_heading = "Data Sources")]
    pub processor_data: Option<PathBuf>,

    /// Workload dataset (JSON); the bundled dataset is used when omitted
    #[arg(long, help_heading = "Data Sources")]
    pub workload_data: Option<PathBuf>,

    /// File holding the preferred workload type
    #[arg(long, default_value = DEFAULT_PREFS_FILE, help_heading = "Data Sources")]
    pub prefs_file: PathBuf,

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Comparison mode: power-intel, power-mainframe, intel-mainframe, all
    #[arg(long, default_value = "power-intel", help_heading = "Comparison")]
    pub mode: String,

    /// POWER processor id (e.g. power9-22c)
    #[arg(long, help_heading = "Comparison")]
    pub power: Option<String>,

    /// Intel processor id (e.g. xeon-gold-6148)
    #[arg(long, help_heading = "Comparison")]
    pub intel: Option<String>,

    /// Mainframe processor id (e.g. z10ec-2097-716)
    #[arg(long, help_heading = "Comparison")]
    pub mainframe: Option<String>,

    /// Workload type id; defaults to the saved preference
    #[arg(long, help_heading = "Comparison")]
    pub workload: Option<String>,

    /// Units of the first processor behind its totals (0 counts as 1)
    #[arg(long, default_value = "1", help_heading = "Comparison")]
    pub processor_quantity: u32,

    /// Also write the plain-text export to this file
    #[arg(long, help_heading = "Comparison")]
    pub export: Option<PathBuf>,

    // =========================================================================
    // Quantity Equivalence
    // =========================================================================

    /// Source processor type: power, intel, mainframe
    #[arg(long, help_heading = "Quantity Equivalence")]
    pub source_type: Option<String>,

    /// Source processor id
    #[arg(long, help_heading = "Quantity Equivalence")]
    pub source: Option<String>,

    /// Target processor type: power, intel, mainframe
    #[arg(long, help_heading = "Quantity Equivalence")]
    pub target_type: Option<String>,

    /// Target processor id
    #[arg(long, help_heading = "Quantity Equivalence")]
    pub target: Option<String>,

    /// Number of source processors (0 is treated as 1)
    #[arg(long, default_value = "1", help_heading = "Quantity Equivalence")]
    pub source_quantity: u32,

    // =========================================================================
    // Migration Sizing
    // =========================================================================

    /// Mainframe capacity in MIPS
    #[arg(long, default_value = "", help_heading = "Migration Sizing")]
    pub mips: String,

    /// Average utilization in percent (1-100)
    #[arg(long, default_value = "", help_heading = "Migration Sizing")]
    pub utilization: String,

    /// Workload type id, or "custom" to use the --mix-* percentages
    #[arg(long, default_value = "", help_heading = "Migration Sizing")]
    pub migration_workload: String,

    /// Target platform: power, intel, both
    #[arg(long, default_value = "both", help_heading = "Migration Sizing")]
    pub target_platform: String,

    /// Custom mix: processor-intensive share in percent
    #[arg(long, default_value = "0", help_heading = "Migration Sizing")]
    pub mix_pi: u32,

    /// Custom mix: TPC-C share in percent
    #[arg(long, default_value = "0", help_heading = "Migration Sizing")]
    pub mix_tpcc: u32,

    /// Custom mix: commercial share in percent
    #[arg(long, default_value = "0", help_heading = "Migration Sizing")]
    pub mix_commercial: u32,

    /// Custom mix: mixed share in percent
    #[arg(long, default_value = "0", help_heading = "Migration Sizing")]
    pub mix_mixed: u32,

    /// Custom mix: business-intelligence share in percent
    #[arg(long, default_value = "0", help_heading = "Migration Sizing")]
    pub mix_bi: u32,

    // =========================================================================
    // Modes
    // =========================================================================

    /// List processors and workload types (default mode)
    #[arg(long, default_value = "false", help_heading = "Modes")]
    pub list: bool,

    /// Compare two processors
    #[arg(long, default_value = "false", help_heading = "Modes")]
    pub compare: bool,

    /// Compute how many target processors match the source processors
    #[arg(long, default_value = "false", help_heading = "Modes")]
    pub quantity: bool,

    /// Size a mainframe migration onto POWER and/or Intel
    #[arg(long, default_value = "false", help_heading = "Modes")]
    pub migrate: bool,

    /// Serve the interactive dashboard
    #[arg(long, default_value = "false", help_heading = "Modes")]
    pub serve: bool,

    /// Dashboard port
    #[arg(long, default_value = "8080", help_heading = "Modes")]
    pub port: u16,

    /// Print results as JSON instead of text
    #[arg(long, default_value = "false", help_heading = "Modes")]
    pub json: bool,
}

impl Cli {
    /// Comparison selection; `preferred` fills a missing `--workload`.
    pub fn to_selection(&self, preferred: Option<String>) -> Selection {
        Selection {
            mode: ComparisonMode::from_str(&self.mode),
            power: self.power.clone(),
            intel: self.intel.clone(),
            mainframe: self.mainframe.clone(),
            workload: self.workload.clone().or(preferred),
            quantity: Some(self.processor_quantity),
        }
    }

    /// Quantity request. Unknown type names count as "not selected".
    pub fn to_quantity_request(&self, preferred: Option<String>) -> QuantityRequest {
        QuantityRequest {
            source_kind: self.source_type.as_deref().and_then(ProcessorKind::from_str),
            source_id: self.source.clone(),
            target_kind: self.target_type.as_deref().and_then(ProcessorKind::from_str),
            target_id: self.target.clone(),
            source_quantity: Some(self.source_quantity),
            workload: self.workload.clone().or(preferred),
        }
    }

    pub fn to_mix(&self) -> WorkloadMix {
        WorkloadMix {
            processor_intensive: self.mix_pi,
            tpc_c: self.mix_tpcc,
            commercial: self.mix_commercial,
            mixed: self.mix_mixed,
            business_intelligence: self.mix_bi,
        }
    }

    /// Migration form values, validated later by the sizer.
    pub fn to_migration_form(&self) -> MigrationForm {
        MigrationForm {
            source_mips: self.mips.clone(),
            utilization: self.utilization.clone(),
            workload: self.migration_workload.clone(),
            target: self.target_platform.clone(),
            mix: self.to_mix(),
        }
    }
}

/// Format a rating: whole numbers without decimals.
pub fn format_rating(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Text bar of `width_pct` percent, `cells` characters wide.
pub fn format_bar(width_pct: f64, cells: usize) -> String {
    let filled = ((width_pct.clamp(0.0, 100.0) / 100.0) * cells as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), ".".repeat(cells - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_workload_uses_preference() {
        let cli = Cli::parse_from(["procsize", "--compare", "--power", "p", "--intel", "i"]);
        let sel = cli.to_selection(Some("mixed".into()));
        assert_eq!(sel.workload.as_deref(), Some("mixed"));
        assert_eq!(sel.mode, Some(ComparisonMode::PowerIntel));

        let cli = Cli::parse_from(["procsize", "--compare", "--workload", "tpc-c"]);
        assert_eq!(cli.to_selection(Some("mixed".into())).workload.as_deref(), Some("tpc-c"));
    }

    #[test]
    fn unknown_mode_is_unselected() {
        let cli = Cli::parse_from(["procsize", "--mode", "sparc-vs-alpha"]);
        assert_eq!(cli.to_selection(None).mode, None);
    }

    #[test]
    fn processor_quantity_reaches_the_selection() {
        let cli = Cli::parse_from(["procsize", "--compare", "--processor-quantity", "4"]);
        assert_eq!(cli.to_selection(None).first_quantity(), 4);

        let cli = Cli::parse_from(["procsize", "--compare", "--processor-quantity", "0"]);
        assert_eq!(cli.to_selection(None).first_quantity(), 1);
    }

    #[test]
    fn mix_flags_feed_the_form() {
        let cli = Cli::parse_from([
            "procsize", "--migrate", "--mips", "1000", "--utilization", "80",
            "--migration-workload", "custom", "--mix-pi", "50", "--mix-bi", "50",
        ]);
        let form = cli.to_migration_form();
        assert_eq!(form.mix.total(), 100);
        assert_eq!(form.target, "both");
    }

    #[test]
    fn bars_and_ratings() {
        assert_eq!(format_bar(50.0, 10), "#####.....");
        assert_eq!(format_bar(150.0, 4), "####");
        assert_eq!(format_rating(1200.0), "1200");
        assert_eq!(format_rating(737.5), "737.5");
    }
}
