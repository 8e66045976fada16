use crate::Formulation::components::LipidComponent;
use serde::Serialize;

/// A literature LNP formulation: component identities, molecular weights and molar
/// percentages of an FDA-approved product. The engine treats an expanded preset exactly
/// like user-entered components.
#[derive(Debug, Clone, Serialize)]
pub struct FormulationPreset {
    pub name: &'static str,
    pub full_name: &'static str,
    pub ionizable_lipid: &'static str,
    pub ionizable_mw: f64,
    pub ionizable_percent: f64,
    pub helper_lipid: &'static str,
    pub helper_mw: f64,
    pub helper_percent: f64,
    pub cholesterol_mw: f64,
    pub cholesterol_percent: f64,
    pub peg_lipid: &'static str,
    pub peg_mw: f64,
    pub peg_percent: f64,
    /// Reference N/P ratio reported for the product.
    pub np_ratio: f64,
    /// Reference ionizable-lipid-to-nucleic-acid mass ratio.
    pub mass_ratio: f64,
    pub description: &'static str,
}

impl FormulationPreset {
    /// Expands the preset into a standard 4-component list. Stock concentrations are
    /// lab-specific and therefore supplied by the caller.
    pub fn components(
        &self,
        ionizable_conc: f64,
        helper_conc: f64,
        cholesterol_conc: f64,
        peg_conc: f64,
    ) -> Vec<LipidComponent> {
        vec![
            LipidComponent::new(
                self.ionizable_lipid,
                self.ionizable_mw,
                ionizable_conc,
                self.ionizable_percent,
            ),
            LipidComponent::new(self.helper_lipid, self.helper_mw, helper_conc, self.helper_percent),
            LipidComponent::new(
                "Cholesterol",
                self.cholesterol_mw,
                cholesterol_conc,
                self.cholesterol_percent,
            ),
            LipidComponent::new(self.peg_lipid, self.peg_mw, peg_conc, self.peg_percent),
        ]
    }
}

/// FDA-approved LNP formulations with literature parameters.
pub const FDA_PRESETS: &[FormulationPreset] = &[
    FormulationPreset {
        name: "D-Lin-MC3-DMA",
        full_name: "D-Lin-MC3-DMA (Onpattro - Alnylam)",
        ionizable_lipid: "D-Lin-MC3-DMA",
        ionizable_mw: 642.1,
        ionizable_percent: 50.0,
        helper_lipid: "DSPC",
        helper_mw: 790.147,
        helper_percent: 10.0,
        cholesterol_mw: 386.654,
        cholesterol_percent: 38.5,
        peg_lipid: "DMG-PEG 2000",
        peg_mw: 2509.2,
        peg_percent: 1.5,
        np_ratio: 6.0,
        mass_ratio: 11.5,
        description: "First FDA-approved RNAi therapeutic for hereditary transthyretin amyloidosis",
    },
    FormulationPreset {
        name: "SM-102",
        full_name: "SM-102 (Spikevax - Moderna)",
        ionizable_lipid: "SM-102",
        ionizable_mw: 710.182,
        ionizable_percent: 50.0,
        helper_lipid: "DSPC",
        helper_mw: 790.147,
        helper_percent: 10.0,
        cholesterol_mw: 386.654,
        cholesterol_percent: 38.5,
        peg_lipid: "DMG-PEG 2000",
        peg_mw: 2509.2,
        peg_percent: 1.5,
        np_ratio: 6.0,
        mass_ratio: 13.0,
        description: "Moderna COVID-19 mRNA vaccine formulation",
    },
    FormulationPreset {
        name: "ALC-0315",
        full_name: "ALC-0315 (Comirnaty - Pfizer-BioNTech)",
        ionizable_lipid: "ALC-0315",
        ionizable_mw: 766.0,
        ionizable_percent: 46.3,
        helper_lipid: "DSPC",
        helper_mw: 790.147,
        helper_percent: 9.4,
        cholesterol_mw: 386.654,
        cholesterol_percent: 42.7,
        peg_lipid: "ALC-0159",
        peg_mw: 2332.0,
        peg_percent: 1.6,
        np_ratio: 6.0,
        mass_ratio: 14.0,
        description: "Pfizer-BioNTech COVID-19 mRNA vaccine formulation",
    },
];

/// Looks up a preset by its short name ("SM-102", "ALC-0315", "D-Lin-MC3-DMA").
pub fn find_preset(name: &str) -> Option<&'static FormulationPreset> {
    FDA_PRESETS.iter().find(|p| p.name == name)
}
