//! Processor Architecture Comparison & Mainframe Migration Sizing
//!
//! Compares IBM POWER, Intel Xeon and IBM mainframe processors on a
//! workload-normalized performance scale, converts processor quantities
//! between architectures, and sizes the cores a mainframe workload needs
//! on POWER or Intel. Results are printed as text or JSON, or explored in
//! a local dashboard (`--serve`).

mod cli;
mod compare;
mod data;
mod error;
mod migrate;
mod model;
mod prefs;
mod report;
mod selectors;
mod server;

#[cfg(test)]
mod tests;

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cli::{format_bar, format_rating, Cli};
use data::Datasets;
use error::Result;
use prefs::PrefsStore;
use report::{format_data_size, format_number, ComparisonReport, MigrationReport, QuantityReport};

fn main() -> ExitCode {
    init_tracing();
    let args = Cli::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if e.is_validation() {
                eprintln!("{}", e);
            } else {
                error!(error = %e, "procsize failed");
                eprintln!("error: {}", e);
            }
            e.exit_code()
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed (tests); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: &Cli) -> Result<()> {
    let data = Datasets::load(args.processor_data.as_deref(), args.workload_data.as_deref())?;
    let prefs = PrefsStore::new(&args.prefs_file);

    if args.serve {
        return server::serve(args.port, &data, &prefs);
    }
    if args.compare {
        return run_compare(args, &data, &prefs);
    }
    if args.quantity {
        return run_quantity(args, &data, &prefs);
    }
    if args.migrate {
        return run_migrate(args, &data);
    }

    run_list(args, &data, &prefs)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// List
// ============================================================================

fn run_list(args: &Cli, data: &Datasets, prefs: &PrefsStore) -> Result<()> {
    let set = selectors::selector_set(&data.processors, &data.workloads, prefs.preferred_workload());
    if args.json {
        return print_json(&set);
    }

    println!("=== Processors ===\n");
    for selector in &set.processors {
        println!("{}:", selector.kind.label());
        for group in &selector.groups {
            println!("  {}", group.label);
            for option in &group.options {
                println!("    {:<24} {}", option.value, option.text);
            }
        }
        println!();
    }

    println!("=== Workload Types ===\n");
    for workload in &data.workloads.workload_types {
        let marker = if set.preferred_workload.as_deref() == Some(workload.id.as_str()) { "*" } else { " " };
        println!(" {}{:<24} {:>4} tpm/MIPS  {}", marker, workload.id, workload.tpm_per_mips, workload.name);
    }
    if set.preferred_workload.is_some() {
        println!("\n  (* saved preference)");
    }
    Ok(())
}

// ============================================================================
// Compare
// ============================================================================

fn run_compare(args: &Cli, data: &Datasets, prefs: &PrefsStore) -> Result<()> {
    let selection = args.to_selection(prefs.preferred_workload());
    let result = compare::compare(data, &selection)?;

    // Preference follows the last successful comparison
    prefs.save_workload(&result.workload.id)?;

    let report = ComparisonReport::build(result);
    if let Some(path) = &args.export {
        let text = report.export_text();
        std::fs::write(path, &text)?;
        info!(path = %path.display(), size = %format_data_size(text.len() as u64), "comparison exported");
    }
    if args.json {
        return print_json(&report);
    }

    let result = &report.result;
    println!("=== Processor Comparison ===\n");
    println!("Workload:  {} ({} tpm/MIPS)", result.workload.name, result.workload.tpm_per_mips);
    println!("Ratio:     {:.2} ({})", result.equivalence.ratio, result.verdict.name());
    println!();

    println!("--- Summary ---");
    println!("  {}", report.summary);
    println!();

    println!("--- Scores ---");
    for card in &report.score_cards {
        println!("  [{}] {:<28} {:<22} {}", card.badge, card.processor, card.label, format_rating(card.value));
    }
    println!();

    println!("--- Metrics ---");
    for group in &report.metrics {
        println!("  {}", group.title);
        for bar in &group.bars {
            println!("    {:<28} {} {}", bar.processor, format_bar(bar.width_pct, 30), format_rating(bar.value));
        }
    }
    println!();

    println!("--- Details ---");
    println!("  {:<40} {:<36} {}", "", result.first.processor.name, result.second.processor.name);
    for row in &report.details {
        println!("  {:<40} {:<36} {}", row.label, row.first, row.second);
    }
    Ok(())
}

// ============================================================================
// Quantity
// ============================================================================

fn run_quantity(args: &Cli, data: &Datasets, prefs: &PrefsStore) -> Result<()> {
    let mut request = args.to_quantity_request(prefs.preferred_workload());
    // A bare id is enough; its family tells the type
    let infer = |id: &Option<String>| id.as_deref().and_then(|id| data.processors.find_any(id)).map(|(k, _)| k);
    request.source_kind = request.source_kind.or_else(|| infer(&request.source_id));
    request.target_kind = request.target_kind.or_else(|| infer(&request.target_id));
    let report = QuantityReport::build(compare::quantity(data, &request)?);
    if args.json {
        return print_json(&report);
    }

    println!("=== Processor Quantity Equivalence ===\n");
    println!("Workload:  {} ({} tpm/MIPS)", report.result.workload.name, report.result.workload.tpm_per_mips);
    println!();
    println!("  {}", report.headline);
    println!();
    for side in [&report.source, &report.target] {
        println!("  {} x {}", side.quantity, side.name);
        println!("    {}:  {} per unit, {} total", side.metric, format_rating(side.per_unit), format_rating(side.total));
        match side.total_threads {
            Some(threads) => println!("    Cores:    {} ({} threads)", side.total_cores, threads),
            None => println!("    Cores:    {}", side.total_cores),
        }
    }
    println!();
    println!("  {}", report.note);
    Ok(())
}

// ============================================================================
// Migrate
// ============================================================================

fn run_migrate(args: &Cli, data: &Datasets) -> Result<()> {
    let form = args.to_migration_form();
    let report = MigrationReport::build(migrate::size_form(&data.workloads, &form)?);
    if args.json {
        return print_json(&report);
    }

    println!("=== Mainframe Migration Sizing ===\n");
    if form.workload.trim() == migrate::CUSTOM_WORKLOAD_ID {
        println!("  Custom mix {} -> {} tpm/MIPS", form.mix.total_label(), report.result.workload_factor);
    }
    println!("  {}", report.summary);
    println!();
    println!("  Total required transactions per minute (tpm): {}", report.required_tpm_display);
    println!();

    let sizing = &report.result;
    for (text, platform) in [(&report.power, &sizing.power), (&report.intel, &sizing.intel)] {
        let Some(text) = text else { continue };
        println!("--- {} ---", text.heading);
        println!("  {}", text.cores_line);
        println!("  {}", text.basis_line);
        println!("  Recommended configuration:");
        for line in platform.recommendation {
            println!("    - {}", line);
        }
        println!("  Advantages:");
        for line in platform.advantages {
            println!("    - {}", line);
        }
        println!();
    }

    println!(
        "Effective MIPS: {}",
        format_number((sizing.source_mips as f64 * sizing.utilization_pct as f64 / 100.0).round() as u64)
    );
    Ok(())
}
