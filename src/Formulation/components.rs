use crate::Formulation::np_ratio::mass_ratio_from_np;
use crate::Formulation::units::{FormulationError, check_positive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance on the 100% molar sum check.
pub const MOLAR_SUM_TOLERANCE: f64 = 0.01;
/// Common aqueous:ethanol phase volume ratio (3:1).
pub const DEFAULT_AQUEOUS_TO_ETHANOL: f64 = 3.0;
/// Most ionizable lipids carry a single protonatable tertiary amine.
pub const DEFAULT_AMINES_PER_MOLECULE: f64 = 1.0;

/// Kind of nucleic acid payload. Carried for labeling and history records only: the
/// phosphate arithmetic uses the same mass/330 convention for every kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NucleicAcidKind {
    PDna,
    MRna,
    SiRna,
    Other,
}

impl fmt::Display for NucleicAcidKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            NucleicAcidKind::PDna => "pDNA",
            NucleicAcidKind::MRna => "mRNA",
            NucleicAcidKind::SiRna => "siRNA",
            NucleicAcidKind::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

/// One ingredient of the lipid mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LipidComponent {
    pub name: String,
    /// ug/umol (equivalent to g/mol).
    pub molecular_weight: f64,
    /// ug/uL of the stock solution.
    pub stock_concentration: f64,
    /// Share of total lipid moles, percent. All components of one formulation sum to 100.
    pub molar_percent: f64,
}

impl LipidComponent {
    pub fn new(name: &str, molecular_weight: f64, stock_concentration: f64, molar_percent: f64) -> Self {
        Self {
            name: name.to_string(),
            molecular_weight,
            stock_concentration,
            molar_percent,
        }
    }
}

/// Complete input of one formulation calculation. Constructed fresh from form input for
/// every request; the ionizable lipid is always the first component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulationRequest {
    pub name: String,
    pub na_kind: NucleicAcidKind,
    /// Target nucleic acid scale, ug.
    pub nucleic_acid_mass_ug: f64,
    /// Nucleic acid stock concentration, ug/uL.
    pub nucleic_acid_stock_conc: f64,
    /// ug ionizable lipid per ug nucleic acid.
    pub ionizable_to_na_ratio: f64,
    /// Volume ratio of aqueous to ethanol phase.
    pub aqueous_to_ethanol_ratio: f64,
    /// Protonatable amine groups per ionizable lipid molecule.
    pub amines_per_molecule: f64,
    /// 4 or 5 entries, ionizable lipid first.
    pub components: Vec<LipidComponent>,
}

impl FormulationRequest {
    pub fn new(
        name: &str,
        na_kind: NucleicAcidKind,
        nucleic_acid_mass_ug: f64,
        nucleic_acid_stock_conc: f64,
        ionizable_to_na_ratio: f64,
        components: Vec<LipidComponent>,
    ) -> Self {
        Self {
            name: name.to_string(),
            na_kind,
            nucleic_acid_mass_ug,
            nucleic_acid_stock_conc,
            ionizable_to_na_ratio,
            aqueous_to_ethanol_ratio: DEFAULT_AQUEOUS_TO_ETHANOL,
            amines_per_molecule: DEFAULT_AMINES_PER_MOLECULE,
            components,
        }
    }

    /// Builds a request from a target N/P ratio instead of a direct mass ratio. The
    /// equivalent mass ratio is derived from the ionizable lipid MW of the first
    /// component.
    pub fn with_target_np(
        name: &str,
        na_kind: NucleicAcidKind,
        nucleic_acid_mass_ug: f64,
        nucleic_acid_stock_conc: f64,
        target_np: f64,
        amines_per_molecule: f64,
        components: Vec<LipidComponent>,
    ) -> Result<Self, FormulationError> {
        let ionizable_mw = components
            .first()
            .map(|c| c.molecular_weight)
            .unwrap_or(0.0);
        let ratio = mass_ratio_from_np(target_np, ionizable_mw, amines_per_molecule)?;
        let mut request = Self::new(
            name,
            na_kind,
            nucleic_acid_mass_ug,
            nucleic_acid_stock_conc,
            ratio,
            components,
        );
        request.amines_per_molecule = amines_per_molecule;
        Ok(request)
    }

    pub fn aqueous_to_ethanol_ratio(mut self, ratio: f64) -> Self {
        self.aqueous_to_ethanol_ratio = ratio;
        self
    }

    pub fn amines_per_molecule(mut self, amines: f64) -> Self {
        self.amines_per_molecule = amines;
        self
    }

    /// The ionizable lipid, by convention the first component.
    pub fn ionizable(&self) -> &LipidComponent {
        &self.components[0]
    }

    /// Fail-fast validation of the whole request. Called by the engine before any
    /// volume arithmetic.
    pub fn validate(&self) -> Result<(), FormulationError> {
        check_positive("nucleic acid mass", self.nucleic_acid_mass_ug)?;
        check_positive("nucleic acid stock concentration", self.nucleic_acid_stock_conc)?;
        check_positive("ionizable lipid to nucleic acid ratio", self.ionizable_to_na_ratio)?;
        check_positive("aqueous to ethanol ratio", self.aqueous_to_ethanol_ratio)?;
        if self.amines_per_molecule < 0.0 {
            return Err(FormulationError::InvalidParameter {
                field: "amines per molecule".to_string(),
                value: self.amines_per_molecule,
            });
        }
        if !(4..=5).contains(&self.components.len()) {
            return Err(FormulationError::ComponentCount {
                count: self.components.len(),
            });
        }
        for c in &self.components {
            check_positive(&format!("{} molecular weight", c.name), c.molecular_weight)?;
            check_positive(&format!("{} stock concentration", c.name), c.stock_concentration)?;
            if !(0.0..=100.0).contains(&c.molar_percent) {
                return Err(FormulationError::PercentOutOfRange {
                    name: c.name.clone(),
                    value: c.molar_percent,
                });
            }
        }
        if self.ionizable().molar_percent == 0.0 {
            return Err(FormulationError::ZeroIonizablePercent);
        }
        let sum: f64 = self.components.iter().map(|c| c.molar_percent).sum();
        if (sum - 100.0).abs() > MOLAR_SUM_TOLERANCE {
            return Err(FormulationError::MolarSumMismatch { sum });
        }
        Ok(())
    }
}
