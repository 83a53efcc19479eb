//! Cross-module test suite for comparison and sizing.
//!
//! # Test Categories
//!
//! - **Invariants**: Arithmetic properties that must hold for any input
//! - **Edge cases**: Boundary values and missing selections
//! - **Reality checks**: Results on the bundled datasets stay plausible
//! - **Rendering**: Report text and chart shapes per comparison type

#[cfg(test)]
mod invariants {
    use proptest::prelude::*;

    use crate::compare::{quantity_equivalence, workload_equivalence, Verdict, REFERENCE_TPM_PER_MIPS};
    use crate::error::SizingError;
    use crate::migrate::{required_cores, required_tpm, WorkloadMix};
    use crate::model::{ProcessorKind, ProcessorRecord};

    fn cpu(multi: f64) -> ProcessorRecord {
        serde_json::from_value(serde_json::json!({
            "id": "cpu", "name": "cpu", "year": 2020, "cores": 16, "threads": 32,
            "multiThreadScore": multi
        }))
        .unwrap()
    }

    fn mainframe(mips: f64) -> ProcessorRecord {
        serde_json::from_value(serde_json::json!({
            "id": "z", "name": "z", "year": 2008, "cores": 4, "mips": mips
        }))
        .unwrap()
    }

    proptest! {
        /// Non-mainframe ratio is the plain score ratio for every workload.
        #[test]
        fn non_mainframe_ratio_ignores_workload(a in 1.0f64..100_000.0, b in 1.0f64..100_000.0, factor in 1.0f64..500.0) {
            let eq = workload_equivalence(&cpu(a), ProcessorKind::Power, &cpu(b), ProcessorKind::Intel, factor);
            prop_assert!((eq.ratio - a / b).abs() < 1e-9);
            let expected = if a / b > 1.2 {
                Verdict::FirstStronger
            } else if a / b < 0.8 {
                Verdict::SecondStronger
            } else {
                Verdict::Comparable
            };
            prop_assert_eq!(Verdict::classify(eq.ratio), expected);
        }

        /// At the reference factor the mainframe normalization is neutral.
        #[test]
        fn reference_factor_is_neutral(mips in 1.0f64..50_000.0, score in 1.0f64..50_000.0) {
            let eq = workload_equivalence(
                &mainframe(mips), ProcessorKind::Mainframe,
                &cpu(score), ProcessorKind::Intel,
                REFERENCE_TPM_PER_MIPS,
            );
            prop_assert!((eq.ratio - mips / score).abs() < 1e-9);
        }

        /// Rounded-up target quantity always covers the source capacity.
        #[test]
        fn quantity_never_under_provisions(s in 1.0f64..20_000.0, t in 1.0f64..20_000.0, qty in 1u32..500) {
            let q = quantity_equivalence(&cpu(s), ProcessorKind::Power, &cpu(t), ProcessorKind::Intel, 120.0, qty).unwrap();
            prop_assert!(q.target_quantity as f64 * t >= s * qty as f64 - 1e-6);
            prop_assert!(((q.target_quantity as f64) - 1.0) * t < s * qty as f64);
        }

        /// Core counts are the ceiling of effective MIPS over MIPS per core.
        #[test]
        fn cores_are_ceiling(mips in 1u64..200_000, util in 1u32..=100, mpc in prop::sample::select(vec![150.0f64, 200.0])) {
            let cores = required_cores(mips as f64, util as f64, mpc);
            let effective = mips as f64 * util as f64 / 100.0;
            prop_assert!(cores as f64 >= effective / mpc);
            prop_assert!((cores as f64) < effective / mpc + 1.0);
        }

        /// Any blend not totalling 100 is rejected, however large the shares.
        #[test]
        fn incomplete_mix_is_rejected(parts in prop::array::uniform5(prop_oneof![0u32..=100, any::<u32>()])) {
            let mix = WorkloadMix {
                processor_intensive: parts[0],
                tpc_c: parts[1],
                commercial: parts[2],
                mixed: parts[3],
                business_intelligence: parts[4],
            };
            let total: u64 = parts.iter().map(|&p| u64::from(p)).sum();
            prop_assert_eq!(mix.factor().is_ok(), total == 100);
        }
    }

    #[test]
    fn shares_that_wrap_to_100_are_rejected() {
        // u32::MAX + 101 wraps to exactly 100 in 32 bits
        let mix = WorkloadMix { processor_intensive: u32::MAX, tpc_c: 101, ..Default::default() };
        assert!(!mix.is_complete());
        assert_eq!(mix.factor(), Err(SizingError::MixNotHundred { total: u64::from(u32::MAX) + 101 }));
    }

    #[test]
    fn required_tpm_example() {
        assert_eq!(required_tpm(1000.0, 120.0, 80.0), 96_000.0);
    }

    #[test]
    fn blend_factor_is_weighted_average() {
        let mix = WorkloadMix {
            processor_intensive: 20,
            tpc_c: 20,
            commercial: 20,
            mixed: 20,
            business_intelligence: 20,
        };
        // (30 + 75 + 120 + 160 + 200) / 5
        assert_eq!(mix.factor().unwrap(), 117.0);
    }
}

#[cfg(test)]
mod edge_cases {
    use crate::compare::{compare, quantity, ComparisonMode, QuantityRequest, Selection};
    use crate::data::Datasets;
    use crate::error::{SelectionError, SizingError};
    use crate::migrate::{size_form, MigrationForm};
    use crate::model::ProcessorKind;

    fn data() -> Datasets {
        Datasets::embedded().unwrap()
    }

    fn form(mips: &str, util: &str) -> MigrationForm {
        MigrationForm {
            source_mips: mips.into(),
            utilization: util.into(),
            workload: "commercial".into(),
            target: "both".into(),
            ..Default::default()
        }
    }

    #[test]
    fn selection_checks_run_in_order() {
        let data = data();
        let mut sel = Selection::default();
        assert_eq!(compare(&data, &sel).unwrap_err(), SelectionError::NoMode);

        sel.mode = Some(ComparisonMode::PowerMainframe);
        assert_eq!(compare(&data, &sel).unwrap_err(), SelectionError::NoWorkload);

        sel.workload = Some("mixed".into());
        assert_eq!(compare(&data, &sel).unwrap_err(), SelectionError::NoPowerProcessor);

        sel.power = Some("power9-12c".into());
        assert_eq!(compare(&data, &sel).unwrap_err(), SelectionError::NoMainframeProcessor);

        sel.mainframe = Some("not-a-mainframe".into());
        assert_eq!(compare(&data, &sel).unwrap_err(), SelectionError::UnknownProcessor);
    }

    #[test]
    fn processor_of_wrong_kind_is_unknown() {
        let sel = Selection {
            mode: Some(ComparisonMode::PowerIntel),
            power: Some("xeon-gold-6148".into()),
            intel: Some("xeon-gold-6338".into()),
            workload: Some("tpc-c".into()),
            ..Default::default()
        };
        assert_eq!(compare(&data(), &sel).unwrap_err(), SelectionError::UnknownProcessor);
    }

    #[test]
    fn utilization_bounds() {
        let data = data();
        assert!(size_form(&data.workloads, &form("1000", "1")).is_ok());
        assert!(size_form(&data.workloads, &form("1000", "100")).is_ok());
        assert_eq!(size_form(&data.workloads, &form("1000", "0")).unwrap_err(), SizingError::InvalidUtilization);
        assert_eq!(size_form(&data.workloads, &form("1000", "101")).unwrap_err(), SizingError::InvalidUtilization);
        assert_eq!(size_form(&data.workloads, &form("0", "50")).unwrap_err(), SizingError::InvalidMips);
        assert_eq!(size_form(&data.workloads, &form("lots", "50")).unwrap_err(), SizingError::InvalidMips);
    }

    #[test]
    fn zero_quantity_means_one() {
        let request = QuantityRequest {
            source_kind: Some(ProcessorKind::Power),
            source_id: Some("power9-22c".into()),
            target_kind: Some(ProcessorKind::Intel),
            target_id: Some("xeon-gold-6148".into()),
            source_quantity: Some(0),
            workload: Some("commercial".into()),
        };
        let result = quantity(&data(), &request).unwrap();
        assert_eq!(result.equivalence.source_quantity, 1);
    }

    #[test]
    fn quantity_requires_both_sides() {
        let request = QuantityRequest {
            target_kind: Some(ProcessorKind::Intel),
            target_id: Some("xeon-gold-6148".into()),
            workload: Some("commercial".into()),
            ..Default::default()
        };
        assert_eq!(quantity(&data(), &request).unwrap_err(), SelectionError::NoSourceProcessor);
    }
}

#[cfg(test)]
mod reality_checks {
    use crate::compare::{compare, ComparisonMode, Selection, Verdict};
    use crate::data::Datasets;
    use crate::migrate::{size_form, MigrationForm};
    use crate::model::ProcessorKind;

    #[test]
    fn newer_generations_are_not_weaker() {
        let data = Datasets::embedded().unwrap();
        let sel = Selection {
            mode: Some(ComparisonMode::PowerIntel),
            power: Some("power10-15c".into()),
            intel: Some("xeon-e5-2680v3".into()),
            workload: Some("commercial".into()),
            ..Default::default()
        };
        let result = compare(&data, &sel).unwrap();
        assert_ne!(result.verdict, Verdict::SecondStronger);
    }

    #[test]
    fn every_processor_has_its_rating() {
        let data = Datasets::embedded().unwrap();
        for family in &data.processors.families {
            for p in &family.processors {
                let rating = crate::compare::performance(p, family.kind);
                assert!(rating > 0.0, "{} has no rating", p.id);
                if family.kind == ProcessorKind::Mainframe {
                    assert!(p.mips_per_core.unwrap_or(0.0) > 0.0, "{} lacks MIPS per core", p.id);
                }
            }
        }
    }

    #[test]
    fn sizing_example_on_bundled_factors() {
        let data = Datasets::embedded().unwrap();
        let form = MigrationForm {
            source_mips: "1000".into(),
            utilization: "80".into(),
            workload: "commercial".into(),
            target: "both".into(),
            ..Default::default()
        };
        let result = size_form(&data.workloads, &form).unwrap();
        assert_eq!(result.required_tpm, 96_000.0);
        // 800 effective MIPS at 150 and 200 MIPS per core
        assert_eq!(result.power.required_cores, 6);
        assert_eq!(result.intel.required_cores, 4);
    }

    #[test]
    fn blend_categories_match_bundled_workloads() {
        let data = Datasets::embedded().unwrap();
        let factors: Vec<f64> = data.workloads.workload_types.iter().map(|w| w.tpm_per_mips).collect();
        assert_eq!(factors, crate::migrate::CATEGORY_FACTORS);
    }

    #[test]
    fn workload_factors_are_ordered() {
        let data = Datasets::embedded().unwrap();
        let factors: Vec<f64> = data.workloads.workload_types.iter().map(|w| w.tpm_per_mips).collect();
        assert!(factors.windows(2).all(|w| w[0] < w[1]), "{:?}", factors);
    }
}

#[cfg(test)]
mod rendering {
    use crate::compare::{compare, ComparisonMode, ComparisonResult, Contender, Selection};
    use crate::data::Datasets;
    use crate::model::ProcessorKind;
    use crate::report::{ComparisonReport, NOT_AVAILABLE};

    fn report(mode: ComparisonMode, power: &str, intel: &str, mainframe: &str) -> ComparisonReport {
        report_of(mode, power, intel, mainframe, None)
    }

    fn report_of(mode: ComparisonMode, power: &str, intel: &str, mainframe: &str, quantity: Option<u32>) -> ComparisonReport {
        let data = Datasets::embedded().unwrap();
        let opt = |s: &str| Some(s.to_string()).filter(|s| !s.is_empty());
        let sel = Selection {
            mode: Some(mode),
            power: opt(power),
            intel: opt(intel),
            mainframe: opt(mainframe),
            workload: Some("commercial".into()),
            quantity,
        };
        ComparisonReport::build(compare(&data, &sel).unwrap())
    }

    #[test]
    fn power_intel_uses_radar_and_thread_rows() {
        let r = report(ComparisonMode::PowerIntel, "power9-22c", "xeon-platinum-8180", "");
        assert_eq!(r.charts.overview.chart_type, "radar");
        assert_eq!(r.charts.overview.data.labels.len(), 7);
        assert!(r.charts.single_thread.is_some());
        assert!(r.details.iter().any(|d| d.label == "Threads"));
        assert!(!r.details.iter().any(|d| d.label == "MIPS Rating"));
        assert_eq!(r.metrics.len(), 4);
        assert!(r.summary.contains("cores and"));
    }

    #[test]
    fn mixed_pair_shows_mips_and_hp_equivalents() {
        let r = report(ComparisonMode::IntelMainframe, "", "xeon-gold-6148", "z10ec-2097-716");
        assert_eq!(r.charts.overview.chart_type, "bar");
        assert_eq!(r.charts.overview.data.labels, ["Multi-Thread Score / MIPS", "Cores"]);
        assert_eq!(r.charts.multi_thread.data.labels, ["Multi-Thread Score vs MIPS"]);
        assert!(r.charts.multi_thread.data.datasets[1].label.ends_with("(MIPS)"));

        let mips_row = r.details.iter().find(|d| d.label == "MIPS Rating").unwrap();
        assert_eq!(mips_row.first, NOT_AVAILABLE);
        assert_eq!(mips_row.second, "11800");
        assert!(r.details.iter().any(|d| d.label == "HP Equivalent (Commercial)"));
        assert!(r.summary.contains("11800 MIPS"));
    }

    #[test]
    fn two_mainframes_skip_single_thread() {
        let data = Datasets::embedded().unwrap();
        let contender = |id: &str| Contender {
            kind: ProcessorKind::Mainframe,
            processor: data.processors.find(id, ProcessorKind::Mainframe).unwrap().clone(),
        };
        let workload = data.workloads.find("commercial").unwrap().clone();
        let result =
            ComparisonResult::evaluate(contender("z10ec-2097-764"), contender("z10bc-2098-z05"), workload).unwrap();
        let r = ComparisonReport::build(result);

        assert!(r.charts.single_thread.is_none());
        assert_eq!(r.charts.overview.data.labels, ["Total MIPS", "MIPS per Core"]);
        assert_eq!(r.charts.multi_thread.data.labels, ["Total MIPS"]);
        assert!(!r.details.iter().any(|d| d.label == "Threads"));
        assert_eq!(r.metrics.iter().map(|g| g.title).collect::<Vec<_>>(), ["Cores", "Total MIPS"]);
        assert!(r.summary.contains("total MIPS capacity"));
    }

    #[test]
    fn several_units_scale_first_totals() {
        let single = report(ComparisonMode::PowerIntel, "power9-22c", "xeon-platinum-8180", "");
        let r = report_of(ComparisonMode::PowerIntel, "power9-22c", "xeon-platinum-8180", "", Some(2));

        // Ratio and verdict stay per unit
        assert_eq!(r.result.first_quantity, 2);
        assert_eq!(r.result.equivalence.ratio, single.result.equivalence.ratio);
        assert_eq!(r.result.verdict, single.result.verdict);

        assert!(r.summary.contains("This comparison is based on 2x IBM POWER9 22-core (SMT4) processors."));
        assert!(!single.summary.contains("based on"));

        // Per-unit cards untouched, first total doubled, second total as is
        assert_eq!(r.score_cards[0], single.score_cards[0]);
        assert_eq!(r.score_cards[2].value, 20_800.0);
        assert_eq!(r.score_cards[2].label, "Total Multi-Thread Score (2x)");
        assert_eq!(r.score_cards[3], single.score_cards[3]);

        let group = |title: &str| r.metrics.iter().find(|g| g.title == title).unwrap().clone();
        assert_eq!(group("Single-Thread Performance").bars[0].value, 96.0);
        assert_eq!(group("Multi-Thread Performance").bars[0].value, 20_800.0);
        assert_eq!(group("Multi-Thread Performance").bars[0].processor, "IBM POWER9 22-core (SMT4) (2x)");
        assert_eq!(group("Cores").bars[0].value, 44.0);
        assert_eq!(group("Threads").bars[0].value, 176.0);
        assert_eq!(group("Threads").bars[0].width_pct, 100.0);

        assert_eq!(r.charts.multi_thread.data.datasets[0].data, [20_800.0]);
        assert_eq!(r.charts.overview.data.datasets[0].label, "IBM POWER9 22-core (SMT4) (2x)");
    }

    #[test]
    fn mainframe_units_scale_total_mips() {
        let r = report_of(ComparisonMode::PowerMainframe, "power9-22c", "", "z10ec-2097-716", Some(3));
        // The POWER side is first here; its mainframe partner keeps one unit
        assert_eq!(r.score_cards[2].value, 31_200.0);
        assert_eq!(r.score_cards[3].value, 11_800.0);
        assert_eq!(r.metrics[0].bars[0].value, 66.0);
        assert_eq!(r.metrics[0].bars[1].value, 16.0);
    }

    #[test]
    fn zero_units_count_as_one() {
        let r = report_of(ComparisonMode::PowerIntel, "power9-22c", "xeon-platinum-8180", "", Some(0));
        assert_eq!(r.result.first_quantity, 1);
        assert_eq!(r.score_cards[2].label, "Multi-Thread Score");
    }

    #[test]
    fn export_lists_every_row() {
        let r = report(ComparisonMode::PowerIntel, "power8-12c", "xeon-e5-2699v3", "");
        let text = r.export_text();
        assert!(text.starts_with("PROCESSOR COMPARISON RESULTS\n=============================="));
        assert!(text.contains("\nSummary:\n"));
        for row in &r.details {
            assert!(text.contains(&format!("{}: {} vs {}", row.label, row.first, row.second)));
        }
    }
}
