//! Option groups for the processor and workload selectors.

use serde::Serialize;

use crate::compare::ComparisonMode;
use crate::migrate::CUSTOM_WORKLOAD_ID;
use crate::model::{ProcessorCatalog, ProcessorKind, WorkloadData, WorkloadType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionGroup {
    pub label: String,
    pub options: Vec<SelectOption>,
}

/// A selector: placeholder plus grouped options.
#[derive(Debug, Clone, Serialize)]
pub struct Selector {
    pub kind: ProcessorKind,
    pub placeholder: String,
    pub groups: Vec<OptionGroup>,
}

/// One option group per non-empty family of `kind`.
pub fn processor_selector(catalog: &ProcessorCatalog, kind: ProcessorKind) -> Selector {
    let groups = catalog
        .families_of(kind)
        .filter(|f| !f.processors.is_empty())
        .map(|f| OptionGroup {
            label: f.label.to_string(),
            options: f
                .processors
                .iter()
                .map(|p| SelectOption { value: p.id.clone(), text: p.name.clone() })
                .collect(),
        })
        .collect();

    Selector {
        kind,
        placeholder: format!("Select {} Processor", kind.label()),
        groups,
    }
}

fn workload_option(w: &WorkloadType) -> SelectOption {
    SelectOption {
        value: w.id.clone(),
        text: format!("{} ({} tpm/MIPS)", w.name, w.tpm_per_mips),
    }
}

/// Workload options for the comparison selector.
pub fn workload_options(workloads: &WorkloadData) -> Vec<SelectOption> {
    workloads.workload_types.iter().map(workload_option).collect()
}

/// Workload options for the migration selector, ending with the custom mix.
pub fn migration_workload_options(workloads: &WorkloadData) -> Vec<SelectOption> {
    let mut options = workload_options(workloads);
    options.push(SelectOption {
        value: CUSTOM_WORKLOAD_ID.to_string(),
        text: "Custom Mix".to_string(),
    });
    options
}

/// Comparison mode and the selectors it shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeOption {
    pub id: &'static str,
    pub visible: Vec<ProcessorKind>,
}

pub fn mode_options() -> Vec<ModeOption> {
    [
        ComparisonMode::PowerIntel,
        ComparisonMode::PowerMainframe,
        ComparisonMode::IntelMainframe,
        ComparisonMode::All,
    ]
    .iter()
    .map(|mode| ModeOption { id: mode.id(), visible: mode.visible_kinds().to_vec() })
    .collect()
}

/// Everything a front end needs to populate its selectors.
#[derive(Debug, Clone, Serialize)]
pub struct SelectorSet {
    pub modes: Vec<ModeOption>,
    pub processors: Vec<Selector>,
    pub workloads: Vec<SelectOption>,
    pub migration_workloads: Vec<SelectOption>,
    pub preferred_workload: Option<String>,
}

pub fn selector_set(
    catalog: &ProcessorCatalog,
    workloads: &WorkloadData,
    preferred_workload: Option<String>,
) -> SelectorSet {
    // A stale preference (workload removed from the dataset) is dropped.
    let preferred_workload = preferred_workload.filter(|id| workloads.find(id).is_some());

    SelectorSet {
        modes: mode_options(),
        processors: ProcessorKind::ALL
            .iter()
            .map(|&kind| processor_selector(catalog, kind))
            .collect(),
        workloads: workload_options(workloads),
        migration_workloads: migration_workload_options(workloads),
        preferred_workload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Datasets;

    #[test]
    fn groups_follow_family_order() {
        let data = Datasets::embedded().unwrap();
        let power = processor_selector(&data.processors, ProcessorKind::Power);
        let labels: Vec<_> = power.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, ["POWER8", "POWER9", "POWER10"]);
        assert_eq!(power.placeholder, "Select POWER Processor");
    }

    #[test]
    fn migration_options_end_with_custom() {
        let data = Datasets::embedded().unwrap();
        let options = migration_workload_options(&data.workloads);
        assert_eq!(options.len(), data.workloads.workload_types.len() + 1);
        assert_eq!(options.last().map(|o| o.value.as_str()), Some("custom"));
        assert!(options[0].text.ends_with("tpm/MIPS)"));
    }

    #[test]
    fn stale_preference_is_dropped() {
        let data = Datasets::embedded().unwrap();
        let set = selector_set(&data.processors, &data.workloads, Some("retired".into()));
        assert_eq!(set.preferred_workload, None);
        let set = selector_set(&data.processors, &data.workloads, Some("mixed".into()));
        assert_eq!(set.preferred_workload.as_deref(), Some("mixed"));
    }

    #[test]
    fn power_intel_hides_mainframe() {
        let modes = mode_options();
        assert_eq!(modes[0].id, "power-intel");
        assert_eq!(modes[0].visible, [ProcessorKind::Power, ProcessorKind::Intel]);
        assert_eq!(modes[3].visible.len(), 3);
    }
}
