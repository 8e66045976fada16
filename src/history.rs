//! Session history of computed formulations, kept in memory and exportable to CSV or
//! JSON for lab notebooks.
use crate::Formulation::components::{FormulationRequest, NucleicAcidKind};
use crate::Formulation::engine::FormulationResult;
use serde::{Deserialize, Serialize};

/// Snapshot of one calculation: the headline inputs plus the full result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub name: String,
    pub na_kind: NucleicAcidKind,
    pub nucleic_acid_mass_ug: f64,
    pub ionizable_to_na_ratio: f64,
    pub np_ratio: f64,
    pub feasible: bool,
    pub result: FormulationResult,
}

impl HistoryRecord {
    pub fn from_calculation(request: &FormulationRequest, result: &FormulationResult) -> Self {
        Self {
            name: request.name.clone(),
            na_kind: request.na_kind,
            nucleic_acid_mass_ug: request.nucleic_acid_mass_ug,
            ionizable_to_na_ratio: request.ionizable_to_na_ratio,
            np_ratio: result.np.ratio,
            feasible: result.is_feasible(),
            result: result.clone(),
        }
    }
}

/// Append-only store of the calculations of one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryStore {
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, request: &FormulationRequest, result: &FormulationResult) {
        self.records
            .push(HistoryRecord::from_calculation(request, result));
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Headline columns only; the full recipes go through [`Self::export_json`].
    pub fn export_csv(&self) -> String {
        let mut out = String::from(
            "Name,Nucleic_Acid,Mass_ug,Ion_NA_Ratio,NP_Ratio,Feasible,Final_Volume_uL\n",
        );
        for r in &self.records {
            out.push_str(&format!(
                "{},{},{:.4},{:.2},{:.2},{},{:.4}\n",
                r.name,
                r.na_kind,
                r.nucleic_acid_mass_ug,
                r.ionizable_to_na_ratio,
                r.np_ratio,
                r.feasible,
                r.result.final_lnp_volume_ul,
            ));
        }
        out
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records)
    }
}
