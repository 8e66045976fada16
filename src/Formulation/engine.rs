use crate::Formulation::components::{FormulationRequest, NucleicAcidKind};
use crate::Formulation::np_ratio::{NpRatio, np_ratio};
use crate::Formulation::units::{FormulationError, mass, volume};
use log::warn;
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};

/// The nucleic acid payload is fixed at 10% w/v of the final product, so the final LNP
/// volume is `mass_ug / 0.1`. Design constant, not user-configurable.
pub const NUCLEIC_ACID_FINAL_FRACTION: f64 = 0.1;
/// Citrate buffer takes a fixed 10% of the aqueous phase (stock is 250 mM citrate).
pub const CITRATE_AQUEOUS_FRACTION: f64 = 0.1;

/// Mass, moles and pipetting volume of one lipid component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentAmounts {
    pub name: String,
    pub mass_ug: f64,
    pub moles_umol: f64,
    pub volume_ul: f64,
}

/// Output of one formulation calculation. Never mutated after creation.
///
/// `ethanol_volume_ul` and `water_volume_ul` may come out negative: the lipid volumes
/// (or the nucleic acid stock volume) alone exceed their phase budget. That is a valid
/// result signaling an infeasible recipe, not an error - check [`Self::is_feasible`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulationResult {
    pub name: String,
    pub na_kind: NucleicAcidKind,
    pub nucleic_acid_mass_ug: f64,
    /// Same order as the request components, ionizable lipid first.
    pub components: Vec<ComponentAmounts>,
    /// Ethanol fill of the organic phase. Negative means infeasible.
    pub ethanol_volume_ul: f64,
    pub nucleic_acid_volume_ul: f64,
    pub citrate_volume_ul: f64,
    /// Water fill of the aqueous phase. Negative means infeasible.
    pub water_volume_ul: f64,
    pub final_lnp_volume_ul: f64,
    pub ethanol_phase_volume_ul: f64,
    pub aqueous_phase_volume_ul: f64,
    pub np: NpRatio,
}

impl FormulationResult {
    /// False when the recipe cannot be realized within the fixed phase-volume budget
    /// (negative ethanol or water remainder).
    pub fn is_feasible(&self) -> bool {
        self.ethanol_volume_ul >= 0.0 && self.water_volume_ul >= 0.0
    }

    pub fn ionizable(&self) -> &ComponentAmounts {
        &self.components[0]
    }

    /// Combined volume of all lipid stocks, the ethanol master mix before the ethanol
    /// fill is added.
    pub fn ethanol_master_mix_volume_ul(&self) -> f64 {
        self.components.iter().map(|c| c.volume_ul).sum()
    }

    /// Citrate plus water, the aqueous master mix before the nucleic acid is added.
    pub fn aqueous_master_mix_volume_ul(&self) -> f64 {
        self.citrate_volume_ul + self.water_volume_ul
    }

    pub fn total_volume_ul(&self) -> f64 {
        self.ethanol_phase_volume_ul + self.aqueous_phase_volume_ul
    }

    /// Realized mole fraction of every lipid component, `n_i / n_total`. Useful as a
    /// cross-check against the requested molar percentages.
    pub fn mole_fractions(&self) -> Vec<(String, f64)> {
        let n_total: f64 = self.components.iter().map(|c| c.moles_umol).sum();
        self.components
            .iter()
            .map(|c| {
                let f = if n_total > 0.0 { c.moles_umol / n_total } else { 0.0 };
                (c.name.clone(), f)
            })
            .collect()
    }

    /// Prints the recipe as a pipetting table.
    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(row!["Component", "Mass (ug)", "Moles (umol)", "Volume (uL)"]);
        for c in &self.components {
            table.add_row(row![
                c.name,
                format!("{:.4}", c.mass_ug),
                format!("{:.6}", c.moles_umol),
                format!("{:.4}", c.volume_ul),
            ]);
        }
        table.add_row(row!["Ethanol", "-", "-", format!("{:.4}", self.ethanol_volume_ul)]);
        table.add_row(row![
            self.na_kind.to_string(),
            format!("{:.4}", self.nucleic_acid_mass_ug),
            "-",
            format!("{:.4}", self.nucleic_acid_volume_ul),
        ]);
        table.add_row(row!["Citrate", "-", "-", format!("{:.4}", self.citrate_volume_ul)]);
        table.add_row(row!["Water", "-", "-", format!("{:.4}", self.water_volume_ul)]);
        table.printstd();

        let mut phases = Table::new();
        phases.add_row(row!["Phase", "Volume (uL)"]);
        phases.add_row(row!["Ethanol phase", format!("{:.4}", self.ethanol_phase_volume_ul)]);
        phases.add_row(row!["Aqueous phase", format!("{:.4}", self.aqueous_phase_volume_ul)]);
        phases.add_row(row!["LNP total", format!("{:.4}", self.total_volume_ul())]);
        phases.add_row(row!["N/P ratio", format!("{:.3}", self.np.ratio)]);
        phases.printstd();
    }
}

/// Computes all component masses, moles and pipetting volumes of a formulation.
///
/// The ionizable lipid is the scaling pivot: its moles come from the mass ratio against
/// the nucleic acid, every other component scales by its molar percent relative to the
/// ionizable percent. The ethanol and water volumes are remainders of their phase
/// budgets and are kept as-is even when negative.
pub fn compute_formulation(
    request: &FormulationRequest,
) -> Result<FormulationResult, FormulationError> {
    request.validate()?;

    let ionizable = request.ionizable();
    let ionizable_moles =
        (request.nucleic_acid_mass_ug * request.ionizable_to_na_ratio) / ionizable.molecular_weight;

    let mut components = Vec::with_capacity(request.components.len());
    for c in &request.components {
        let moles_umol = ionizable_moles * c.molar_percent / ionizable.molar_percent;
        let mass_ug = mass(moles_umol, c.molecular_weight)?;
        let volume_ul = volume(mass_ug, c.stock_concentration)?;
        components.push(ComponentAmounts {
            name: c.name.clone(),
            mass_ug,
            moles_umol,
            volume_ul,
        });
    }

    let final_lnp_volume_ul = request.nucleic_acid_mass_ug / NUCLEIC_ACID_FINAL_FRACTION;
    let r = request.aqueous_to_ethanol_ratio;
    let ethanol_phase_volume_ul = final_lnp_volume_ul / (r + 1.0);
    let lipid_volume_sum: f64 = components.iter().map(|c| c.volume_ul).sum();
    let ethanol_volume_ul = ethanol_phase_volume_ul - lipid_volume_sum;

    let aqueous_phase_volume_ul = final_lnp_volume_ul * r / (r + 1.0);
    let nucleic_acid_volume_ul = request.nucleic_acid_mass_ug / request.nucleic_acid_stock_conc;
    let citrate_volume_ul = CITRATE_AQUEOUS_FRACTION * aqueous_phase_volume_ul;
    let water_volume_ul = aqueous_phase_volume_ul - nucleic_acid_volume_ul - citrate_volume_ul;

    let np = np_ratio(
        request.nucleic_acid_mass_ug,
        ionizable_moles,
        request.amines_per_molecule,
    );

    let result = FormulationResult {
        name: request.name.clone(),
        na_kind: request.na_kind,
        nucleic_acid_mass_ug: request.nucleic_acid_mass_ug,
        components,
        ethanol_volume_ul,
        nucleic_acid_volume_ul,
        citrate_volume_ul,
        water_volume_ul,
        final_lnp_volume_ul,
        ethanol_phase_volume_ul,
        aqueous_phase_volume_ul,
        np,
    };
    if !result.is_feasible() {
        warn!(
            "formulation '{}' is infeasible: ethanol {:.2} uL, water {:.2} uL",
            result.name, result.ethanol_volume_ul, result.water_volume_ul
        );
    }
    Ok(result)
}
