use crate::DOE::design::{
    CHOL_PCT, DEFAULT_MIN_HELPER_PCT, DesignGenerator, DesignMethod, DesignPoint, DoeError,
    FactorRange, ION_DNA_RATIO, ION_PCT, PEG_PCT, filter_valid_points,
};
use crate::Formulation::components::FormulationRequest;
use crate::Formulation::units::FormulationError;
use crate::Formulation::engine::{FormulationResult, compute_formulation};
use log::{info, warn};
use prettytable::{Table, row};
use serde::Serialize;

/// Inputs of a run sheet: the baseline formulation plus the replication layout. Factors
/// absent from a design point keep their baseline values.
#[derive(Debug, Clone)]
pub struct RunSheetParams {
    /// Baseline request with exactly 4 components: ionizable, helper, cholesterol, PEG.
    pub base: FormulationRequest,
    pub min_helper_pct: f64,
    pub n_replicates: u32,
    pub n_blocks: u32,
}

impl RunSheetParams {
    pub fn new(base: FormulationRequest, n_replicates: u32, n_blocks: u32) -> Self {
        Self {
            base,
            min_helper_pct: DEFAULT_MIN_HELPER_PCT,
            n_replicates,
            n_blocks,
        }
    }
}

/// One pipetting row of the run sheet.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub block: u32,
    /// "R001", "R002", ... in generation order.
    pub run_id: String,
    /// 1-based index of the design point within the filtered design.
    pub experiment: usize,
    pub replicate: u32,
    pub ionizable_pct: f64,
    pub helper_pct: f64,
    pub cholesterol_pct: f64,
    pub peg_pct: f64,
    pub ion_na_ratio: f64,
    pub np_ratio: f64,
    pub result: FormulationResult,
}

/// A complete lab run sheet. Infeasible runs (negative ethanol or water) keep their ids
/// but land in `excluded` instead of `runs`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSheet {
    pub design_name: String,
    pub runs: Vec<RunRecord>,
    pub excluded: Vec<RunRecord>,
    pub generated_points: usize,
    pub filtered_points: usize,
}

impl RunSheet {
    /// Min, mean and max N/P ratio over the feasible runs. None when empty.
    pub fn np_summary(&self) -> Option<(f64, f64, f64)> {
        if self.runs.is_empty() {
            return None;
        }
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for run in &self.runs {
            min = min.min(run.np_ratio);
            max = max.max(run.np_ratio);
            sum += run.np_ratio;
        }
        Some((min, sum / self.runs.len() as f64, max))
    }

    pub fn pretty_print(&self) {
        let mut table = Table::new();
        table.add_row(row![
            "Block", "Run", "Exp", "Rep", "Ion %", "Helper %", "Chol %", "PEG %", "Ion:NA",
            "N/P", "Ethanol (uL)", "Water (uL)"
        ]);
        for run in &self.runs {
            table.add_row(row![
                run.block,
                run.run_id,
                run.experiment,
                run.replicate,
                format!("{:.2}", run.ionizable_pct),
                format!("{:.2}", run.helper_pct),
                format!("{:.2}", run.cholesterol_pct),
                format!("{:.2}", run.peg_pct),
                format!("{:.2}", run.ion_na_ratio),
                format!("{:.2}", run.np_ratio),
                format!("{:.4}", run.result.ethanol_volume_ul),
                format!("{:.4}", run.result.water_volume_ul),
            ]);
        }
        table.printstd();
        if let Some((min, mean, max)) = self.np_summary() {
            info!("N/P over {} runs: min {:.2}, mean {:.2}, max {:.2}", self.runs.len(), min, mean, max);
        }
    }

    /// Serializes the feasible runs to CSV for lab import.
    pub fn to_csv(&self) -> String {
        let mut out = String::from(
            "Block,Run_ID,Experiment,Replicate,Ionizable_%,Helper_%,Cholesterol_%,PEG_%,\
             Ion_NA_Ratio,NP_Ratio",
        );
        if let Some(first) = self.runs.first() {
            for c in &first.result.components {
                out.push_str(&format!(",{}_Vol_uL", c.name.replace(' ', "_")));
            }
        }
        out.push_str(",Ethanol_Vol_uL,NA_Vol_uL,Citrate_Vol_uL,Water_Vol_uL,Total_Vol_uL\n");
        for run in &self.runs {
            out.push_str(&format!(
                "{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
                run.block,
                run.run_id,
                run.experiment,
                run.replicate,
                run.ionizable_pct,
                run.helper_pct,
                run.cholesterol_pct,
                run.peg_pct,
                run.ion_na_ratio,
                run.np_ratio,
            ));
            for c in &run.result.components {
                out.push_str(&format!(",{:.4}", c.volume_ul));
            }
            out.push_str(&format!(
                ",{:.4},{:.4},{:.4},{:.4},{:.4}\n",
                run.result.ethanol_volume_ul,
                run.result.nucleic_acid_volume_ul,
                run.result.citrate_volume_ul,
                run.result.water_volume_ul,
                run.result.total_volume_ul(),
            ));
        }
        out
    }
}

/// Generates the design matrix and applies the molar-sum filter.
pub fn generate_design(
    method: &DesignMethod,
    factors: &[FactorRange],
    min_helper_pct: f64,
) -> Result<(Vec<DesignPoint>, usize), DoeError> {
    let points = method.generate(factors)?;
    let generated = points.len();
    let outcome = filter_valid_points(points, min_helper_pct);
    info!(
        "{}: {} points generated, {} valid",
        method.name(),
        generated,
        outcome.points.len()
    );
    Ok((outcome.points, generated))
}

/// Expands design points into a run sheet: blocks outermost, then design points, then
/// replicates. The formulation is computed once per design point per block and shared
/// by its replicates.
pub fn build_run_sheet(
    points: &[DesignPoint],
    params: &RunSheetParams,
    design_name: &str,
    generated_points: usize,
) -> Result<RunSheet, DoeError> {
    params.base.validate()?;
    if params.n_replicates < 1 {
        return Err(FormulationError::InvalidParameter {
            field: "replicate count".to_string(),
            value: params.n_replicates as f64,
        }
        .into());
    }
    if params.n_blocks < 1 {
        return Err(FormulationError::InvalidParameter {
            field: "block count".to_string(),
            value: params.n_blocks as f64,
        }
        .into());
    }
    let base = &params.base;
    let mut runs = Vec::new();
    let mut excluded = Vec::new();
    let mut run_number = 1u32;

    for block in 1..=params.n_blocks {
        for (idx, point) in points.iter().enumerate() {
            let ion_pct = point
                .get(ION_PCT)
                .copied()
                .unwrap_or(base.components[0].molar_percent);
            let chol_pct = point
                .get(CHOL_PCT)
                .copied()
                .unwrap_or(base.components[2].molar_percent);
            let peg_pct = point
                .get(PEG_PCT)
                .copied()
                .unwrap_or(base.components[3].molar_percent);
            let helper_pct = 100.0 - ion_pct - chol_pct - peg_pct;
            if helper_pct < 0.0 {
                continue;
            }
            let ion_na_ratio = point
                .get(ION_DNA_RATIO)
                .copied()
                .unwrap_or(base.ionizable_to_na_ratio);

            let mut request = base.clone();
            request.name = format!("{} exp {}", base.name, idx + 1);
            request.ionizable_to_na_ratio = ion_na_ratio;
            request.components[0].molar_percent = ion_pct;
            request.components[1].molar_percent = helper_pct;
            request.components[2].molar_percent = chol_pct;
            request.components[3].molar_percent = peg_pct;

            let result = compute_formulation(&request)?;
            let np_ratio = result.np.ratio;

            for replicate in 1..=params.n_replicates {
                let record = RunRecord {
                    block,
                    run_id: format!("R{:03}", run_number),
                    experiment: idx + 1,
                    replicate,
                    ionizable_pct: ion_pct,
                    helper_pct,
                    cholesterol_pct: chol_pct,
                    peg_pct,
                    ion_na_ratio,
                    np_ratio,
                    result: result.clone(),
                };
                run_number += 1;
                if record.result.is_feasible() {
                    runs.push(record);
                } else {
                    excluded.push(record);
                }
            }
        }
    }

    if !excluded.is_empty() {
        warn!(
            "{} of {} runs excluded, negative ethanol or water volume",
            excluded.len(),
            excluded.len() + runs.len()
        );
    }

    Ok(RunSheet {
        design_name: design_name.to_string(),
        runs,
        excluded,
        generated_points,
        filtered_points: points.len(),
    })
}

/// One-call pipeline: generate the design, filter it, expand into a run sheet.
pub fn design_and_run(
    method: &DesignMethod,
    factors: &[FactorRange],
    params: &RunSheetParams,
) -> Result<RunSheet, DoeError> {
    let (points, generated) = generate_design(method, factors, params.min_helper_pct)?;
    if points.is_empty() {
        return Err(DoeError::EmptyDesign);
    }
    build_run_sheet(&points, params, method.name(), generated)
}
