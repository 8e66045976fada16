use crate::Formulation::engine::FormulationResult;
use crate::Formulation::units::FormulationError;
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};

/// Overage margin on lipid stocks and ethanol, covering organic-phase handling and
/// evaporation losses.
pub const ETHANOL_OVERAGE: f64 = 1.5;
/// Overage margin on aqueous components (nucleic acid, citrate, water).
pub const AQUEOUS_OVERAGE: f64 = 1.2;
/// Overage applied to the grand total volume in the bulk summary.
pub const BULK_TOTAL_OVERAGE: f64 = 1.2;

/// A single-batch recipe scaled up for bulk preparation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkResult {
    pub name: String,
    pub times: u32,
    /// Lipid volumes scaled by `times * 1.5`, same order as the source result.
    pub component_volumes_ul: Vec<(String, f64)>,
    pub ethanol_volume_ul: f64,
    pub nucleic_acid_volume_ul: f64,
    pub citrate_volume_ul: f64,
    pub water_volume_ul: f64,
    /// Lipid master mix total, `sum(lipid volumes) * times * 1.5`.
    pub ethanol_master_mix_ul: f64,
    /// Citrate + water master mix, `times * 1.2`.
    pub aqueous_master_mix_ul: f64,
    /// Grand total of the single batch scaled by `times * 1.2`.
    pub bulk_total_ul: f64,
}

impl BulkResult {
    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(row!["Component", "Bulk Volume (uL)"]);
        for (name, v) in &self.component_volumes_ul {
            table.add_row(row![name, format!("{:.4}", v)]);
        }
        table.add_row(row!["Ethanol", format!("{:.4}", self.ethanol_volume_ul)]);
        table.add_row(row!["Nucleic Acid", format!("{:.4}", self.nucleic_acid_volume_ul)]);
        table.add_row(row!["Citrate", format!("{:.4}", self.citrate_volume_ul)]);
        table.add_row(row!["Water", format!("{:.4}", self.water_volume_ul)]);
        table.add_row(row![
            format!("Ethanol Master Mix x{} ({}x)", self.times, ETHANOL_OVERAGE),
            format!("{:.4}", self.ethanol_master_mix_ul),
        ]);
        table.add_row(row![
            format!("Aqueous Master Mix x{} ({}x)", self.times, AQUEOUS_OVERAGE),
            format!("{:.4}", self.aqueous_master_mix_ul),
        ]);
        table.add_row(row![
            format!("Bulk Total x{} ({}x)", self.times, BULK_TOTAL_OVERAGE),
            format!("{:.4}", self.bulk_total_ul),
        ]);
        table.printstd();
    }
}

/// Scales a single-batch recipe by `times` replicates with the asymmetric overage
/// margins: organic-phase volumes by `times * 1.5`, aqueous by `times * 1.2`.
pub fn scale_bulk(result: &FormulationResult, times: u32) -> Result<BulkResult, FormulationError> {
    if times < 1 {
        return Err(FormulationError::InvalidParameter {
            field: "bulk preparation times".to_string(),
            value: times as f64,
        });
    }
    let t = times as f64;
    let lipid_factor = t * ETHANOL_OVERAGE;
    let aqueous_factor = t * AQUEOUS_OVERAGE;

    let component_volumes_ul = result
        .components
        .iter()
        .map(|c| (c.name.clone(), c.volume_ul * lipid_factor))
        .collect();

    let single_batch_total: f64 = result.ethanol_master_mix_volume_ul()
        + result.ethanol_volume_ul
        + result.nucleic_acid_volume_ul
        + result.citrate_volume_ul
        + result.water_volume_ul;

    Ok(BulkResult {
        name: result.name.clone(),
        times,
        component_volumes_ul,
        ethanol_volume_ul: result.ethanol_volume_ul * lipid_factor,
        nucleic_acid_volume_ul: result.nucleic_acid_volume_ul * aqueous_factor,
        citrate_volume_ul: result.citrate_volume_ul * aqueous_factor,
        water_volume_ul: result.water_volume_ul * aqueous_factor,
        ethanol_master_mix_ul: result.ethanol_master_mix_volume_ul() * t * ETHANOL_OVERAGE,
        aqueous_master_mix_ul: result.aqueous_master_mix_volume_ul() * t * AQUEOUS_OVERAGE,
        bulk_total_ul: single_batch_total * t * BULK_TOTAL_OVERAGE,
    })
}
