use crate::DOE::design::{CHOL_PCT, FactorRange, ION_DNA_RATIO, ION_PCT, PEG_PCT, create_design_by_name};
use crate::DOE::run_sheet::{RunSheetParams, design_and_run};
use crate::Formulation::bulk::scale_bulk;
use crate::Formulation::components::{FormulationRequest, LipidComponent, NucleicAcidKind};
use crate::Formulation::engine::compute_formulation;
use crate::Formulation::presets::find_preset;
use crate::history::HistoryStore;

fn standard_components() -> Vec<LipidComponent> {
    vec![
        LipidComponent::new("SM-102", 710.182, 40.0, 50.0),
        LipidComponent::new("DSPC", 790.147, 10.0, 10.0),
        LipidComponent::new("Cholesterol", 386.654, 10.0, 38.5),
        LipidComponent::new("PEG-DMG2000", 2509.2, 10.0, 1.5),
    ]
}

pub fn formulation_examples(task: usize) {
    //

    match task {
        0 => {
            // default pDNA recipe at the 3 ug scale, then scaled up 5x for bulk prep
            let request = FormulationRequest::new(
                "default pDNA",
                NucleicAcidKind::PDna,
                3.0,
                1.0,
                10.0,
                standard_components(),
            );
            let result = compute_formulation(&request).unwrap();
            result.pretty_print();
            println!("feasible: {}", result.is_feasible());

            let bulk = scale_bulk(&result, 5).unwrap();
            bulk.pretty_print();

            let mut history = HistoryStore::new();
            history.append(&request, &result);
            println!("{}", history.export_csv());
        }

        1 => {
            // 100 ug pDNA dosed by target N/P instead of a mass ratio
            let request = FormulationRequest::with_target_np(
                "pDNA at N/P 4",
                NucleicAcidKind::PDna,
                100.0,
                1.0,
                4.0,
                1.0,
                vec![
                    LipidComponent::new("SM-102", 710.182, 100.0, 50.0),
                    LipidComponent::new("DSPC", 744.034, 12.5, 10.0),
                    LipidComponent::new("Cholesterol", 386.654, 20.0, 38.5),
                    LipidComponent::new("PEG-DMG2000", 2509.2, 50.0, 1.5),
                ],
            )
            .unwrap();
            let result = compute_formulation(&request).unwrap();
            result.pretty_print();
            println!(
                "N: {:.5} umol, P: {:.5} umol, N/P: {:.2}",
                result.np.amine_umol, result.np.phosphate_umol, result.np.ratio
            );
        }

        2 => {
            // mRNA batch from the Comirnaty literature preset
            let preset = find_preset("ALC-0315").unwrap();
            println!("{}: {}", preset.full_name, preset.description);
            let request = FormulationRequest::new(
                preset.name,
                NucleicAcidKind::MRna,
                50.0,
                1.0,
                preset.mass_ratio,
                preset.components(40.0, 10.0, 10.0, 10.0),
            );
            let result = compute_formulation(&request).unwrap();
            result.pretty_print();
            for (name, f) in result.mole_fractions() {
                println!("{}: {:.3}", name, f);
            }
        }

        3 => {
            // Plackett-Burman screening of the lipid shares plus the Ion:DNA ratio
            let method = create_design_by_name("Plackett-Burman").unwrap();
            let factors = vec![
                FactorRange::new(ION_PCT, 45.0, 55.0),
                FactorRange::new(CHOL_PCT, 33.5, 43.5),
                FactorRange::new(PEG_PCT, 0.5, 2.5),
                FactorRange::new(ION_DNA_RATIO, 5.0, 15.0),
            ];
            let base = FormulationRequest::new(
                "PB screen",
                NucleicAcidKind::PDna,
                3.0,
                1.0,
                10.0,
                standard_components(),
            );
            let params = RunSheetParams::new(base, 2, 1);
            let sheet = design_and_run(&method, &factors, &params).unwrap();
            sheet.pretty_print();
            println!("{}", sheet.to_csv());
        }

        4 => {
            // response-surface grid around the Moderna composition
            let method = create_design_by_name("Central Composite").unwrap();
            let factors = vec![
                FactorRange::new(ION_PCT, 45.0, 55.0),
                FactorRange::new(PEG_PCT, 0.5, 2.5),
            ];
            let base = FormulationRequest::new(
                "CCD around SM-102",
                NucleicAcidKind::PDna,
                3.0,
                1.0,
                10.0,
                standard_components(),
            );
            let params = RunSheetParams::new(base, 3, 2);
            let sheet = design_and_run(&method, &factors, &params).unwrap();
            sheet.pretty_print();
            if let Some((min, mean, max)) = sheet.np_summary() {
                println!("N/P min {:.2} mean {:.2} max {:.2}", min, mean, max);
            }
        }

        _ => {
            println!("no such task");
        }
    }
}
