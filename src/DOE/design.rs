use crate::Formulation::units::FormulationError;
use enum_dispatch::enum_dispatch;
use log::warn;
use nalgebra::SMatrix;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use thiserror::Error;

/// Canonical factor names of the formulation design space. Points carrying the three
/// percentage factors are subject to the molar-sum validity filter.
pub const ION_PCT: &str = "Ionizable_%";
pub const CHOL_PCT: &str = "Cholesterol_%";
pub const PEG_PCT: &str = "PEG_%";
pub const ION_DNA_RATIO: &str = "Ion_DNA_Ratio";

/// The helper lipid takes whatever molar share the three varied lipids leave; design
/// points leaving it less than this are rejected.
pub const DEFAULT_MIN_HELPER_PCT: f64 = 0.5;
/// Run cap of the fractional factorial design.
pub const FRACTIONAL_MAX_RUNS: usize = 16;
const FRACTIONAL_SEED: u64 = 42;

#[derive(Debug, Error)]
pub enum DoeError {
    #[error("no factors selected for the design")]
    EmptyFactorSet,
    #[error("invalid range for factor {name}: min {min} must be less than max {max}")]
    InvalidRange { name: String, min: f64, max: f64 },
    #[error("{design} supports at most {max} factors, got {got}")]
    TooManyFactors {
        design: &'static str,
        max: usize,
        got: usize,
    },
    #[error("no valid design points remain after the molar-sum filter")]
    EmptyDesign,
    #[error("formulation error: {0}")]
    Formulation(#[from] FormulationError),
}

/// One experimental factor with its low/high bounds in natural units.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorRange {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

impl FactorRange {
    pub fn new(name: &str, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            min,
            max,
        }
    }

    pub fn validate(&self) -> Result<(), DoeError> {
        if self.min >= self.max {
            return Err(DoeError::InvalidRange {
                name: self.name.clone(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Maps a coded level in [-1, 1] onto the natural range.
    pub fn level(&self, coded: f64) -> f64 {
        self.min + (coded + 1.0) / 2.0 * (self.max - self.min)
    }

    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// One row of the design matrix: factor name to natural value.
pub type DesignPoint = HashMap<String, f64>;

fn validate_factors(factors: &[FactorRange]) -> Result<(), DoeError> {
    if factors.is_empty() {
        return Err(DoeError::EmptyFactorSet);
    }
    for f in factors {
        f.validate()?;
    }
    Ok(())
}

/// Cartesian product over per-factor level lists, row-major with the last factor
/// varying fastest.
fn cartesian(levels: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let total: usize = levels.iter().map(|l| l.len()).product();
    let mut rows = Vec::with_capacity(total);
    for mut index in 0..total {
        let mut row = vec![0.0; levels.len()];
        for (i, l) in levels.iter().enumerate().rev() {
            row[i] = l[index % l.len()];
            index /= l.len();
        }
        rows.push(row);
    }
    rows
}

fn to_points(factors: &[FactorRange], rows: Vec<Vec<f64>>) -> Vec<DesignPoint> {
    rows.into_iter()
        .map(|row| {
            factors
                .iter()
                .zip(row)
                .map(|(f, v)| (f.name.clone(), v))
                .collect()
        })
        .collect()
}

#[enum_dispatch]
pub trait DesignGenerator {
    fn generate(&self, factors: &[FactorRange]) -> Result<Vec<DesignPoint>, DoeError>;
    fn name(&self) -> &'static str;
}

/// All 2^n corner combinations of the factor ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullFactorial2Level;

impl DesignGenerator for FullFactorial2Level {
    fn generate(&self, factors: &[FactorRange]) -> Result<Vec<DesignPoint>, DoeError> {
        validate_factors(factors)?;
        let levels: Vec<Vec<f64>> = factors
            .iter()
            .map(|f| vec![f.level(-1.0), f.level(1.0)])
            .collect();
        Ok(to_points(factors, cartesian(&levels)))
    }

    fn name(&self) -> &'static str {
        "Full Factorial (2-Level)"
    }
}

/// All 3^n combinations of low, center and high levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullFactorial3Level;

impl DesignGenerator for FullFactorial3Level {
    fn generate(&self, factors: &[FactorRange]) -> Result<Vec<DesignPoint>, DoeError> {
        validate_factors(factors)?;
        let levels: Vec<Vec<f64>> = factors
            .iter()
            .map(|f| vec![f.min, f.center(), f.max])
            .collect();
        Ok(to_points(factors, cartesian(&levels)))
    }

    fn name(&self) -> &'static str {
        "Full Factorial (3-Level)"
    }
}

/// Seeded random subsample of the 2-level full factorial, capped at 16 runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FractionalFactorial;

impl DesignGenerator for FractionalFactorial {
    fn generate(&self, factors: &[FactorRange]) -> Result<Vec<DesignPoint>, DoeError> {
        let mut points = FullFactorial2Level.generate(factors)?;
        if points.len() > FRACTIONAL_MAX_RUNS {
            let mut rng = StdRng::seed_from_u64(FRACTIONAL_SEED);
            points.shuffle(&mut rng);
            points.truncate(FRACTIONAL_MAX_RUNS);
        }
        Ok(points)
    }

    fn name(&self) -> &'static str {
        "Fractional Factorial"
    }
}

// Standard 12-run Plackett-Burman matrix restricted to the first 4 columns.
#[rustfmt::skip]
const PB_SIGNS: [f64; 48] = [
     1.0,  1.0,  1.0,  1.0,
     1.0, -1.0,  1.0, -1.0,
     1.0,  1.0, -1.0,  1.0,
     1.0,  1.0,  1.0, -1.0,
    -1.0,  1.0,  1.0,  1.0,
    -1.0, -1.0,  1.0,  1.0,
    -1.0, -1.0, -1.0,  1.0,
    -1.0, -1.0, -1.0, -1.0,
    -1.0,  1.0, -1.0, -1.0,
    -1.0,  1.0,  1.0, -1.0,
     1.0, -1.0, -1.0, -1.0,
     1.0,  1.0, -1.0,  1.0,
];

/// Plackett-Burman screening design: min(12, 2^(n+1)) rows of the fixed sign matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlackettBurman;

impl DesignGenerator for PlackettBurman {
    fn generate(&self, factors: &[FactorRange]) -> Result<Vec<DesignPoint>, DoeError> {
        validate_factors(factors)?;
        let n = factors.len();
        if n > 4 {
            return Err(DoeError::TooManyFactors {
                design: "Plackett-Burman",
                max: 4,
                got: n,
            });
        }
        let signs: SMatrix<f64, 12, 4> = SMatrix::from_row_slice(&PB_SIGNS);
        let n_rows = 12usize.min(1 << (n + 1));
        let rows = (0..n_rows)
            .map(|r| (0..n).map(|c| factors[c].level(signs[(r, c)])).collect())
            .collect();
        Ok(to_points(factors, rows))
    }

    fn name(&self) -> &'static str {
        "Plackett-Burman"
    }
}

/// Center point plus one-factor-at-a-time excursions to each bound, 2n + 1 points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxBehnken;

impl DesignGenerator for BoxBehnken {
    fn generate(&self, factors: &[FactorRange]) -> Result<Vec<DesignPoint>, DoeError> {
        validate_factors(factors)?;
        let center: Vec<f64> = factors.iter().map(|f| f.center()).collect();
        let mut rows = vec![center.clone()];
        for (i, f) in factors.iter().enumerate() {
            for val in [f.min, f.max] {
                let mut row = center.clone();
                row[i] = val;
                rows.push(row);
            }
        }
        Ok(to_points(factors, rows))
    }

    fn name(&self) -> &'static str {
        "Box-Behnken"
    }
}

/// 2-level factorial corners plus axial star points at center +/- sqrt(n) * half-range
/// / 2 plus one center point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralComposite;

impl DesignGenerator for CentralComposite {
    fn generate(&self, factors: &[FactorRange]) -> Result<Vec<DesignPoint>, DoeError> {
        let mut points = FullFactorial2Level.generate(factors)?;
        let n = factors.len();
        let alpha = (n as f64).sqrt();
        let center: Vec<f64> = factors.iter().map(|f| f.center()).collect();
        let mut rows = Vec::with_capacity(2 * n + 1);
        for (i, f) in factors.iter().enumerate() {
            let half_range = (f.max - f.min) / 2.0;
            for sign in [-1.0, 1.0] {
                let mut row = center.clone();
                row[i] = center[i] + sign * alpha * half_range / 2.0;
                rows.push(row);
            }
        }
        rows.push(center);
        points.extend(to_points(factors, rows));
        Ok(points)
    }

    fn name(&self) -> &'static str {
        "Central Composite"
    }
}

/// Simplex lattice over {0, 0.5, 1} proportions normalized to sum 1, each proportion
/// then mapped onto its factor range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixtureDesign;

impl DesignGenerator for MixtureDesign {
    fn generate(&self, factors: &[FactorRange]) -> Result<Vec<DesignPoint>, DoeError> {
        validate_factors(factors)?;
        let levels: Vec<Vec<f64>> = factors.iter().map(|_| vec![0.0, 0.5, 1.0]).collect();
        let rows = cartesian(&levels)
            .into_iter()
            .filter_map(|row| {
                let total: f64 = row.iter().sum();
                if total > 0.0 {
                    Some(
                        row.iter()
                            .zip(factors)
                            .map(|(p, f)| f.min + p / total * (f.max - f.min))
                            .collect(),
                    )
                } else {
                    None
                }
            })
            .collect();
        Ok(to_points(factors, rows))
    }

    fn name(&self) -> &'static str {
        "Mixture Design"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[enum_dispatch(DesignGenerator)]
pub enum DesignMethod {
    FullFactorial2Level(FullFactorial2Level),
    FullFactorial3Level(FullFactorial3Level),
    FractionalFactorial(FractionalFactorial),
    PlackettBurman(PlackettBurman),
    BoxBehnken(BoxBehnken),
    CentralComposite(CentralComposite),
    MixtureDesign(MixtureDesign),
}

pub fn create_design_by_name(name: &str) -> Option<DesignMethod> {
    match name {
        "Full Factorial (2-Level)" => Some(DesignMethod::FullFactorial2Level(FullFactorial2Level)),
        "Full Factorial (3-Level)" => Some(DesignMethod::FullFactorial3Level(FullFactorial3Level)),
        "Fractional Factorial" => Some(DesignMethod::FractionalFactorial(FractionalFactorial)),
        "Plackett-Burman" => Some(DesignMethod::PlackettBurman(PlackettBurman)),
        "Box-Behnken" => Some(DesignMethod::BoxBehnken(BoxBehnken)),
        "Central Composite" => Some(DesignMethod::CentralComposite(CentralComposite)),
        "Mixture Design" => Some(DesignMethod::MixtureDesign(MixtureDesign)),
        _ => None,
    }
}

/// Result of the molar-sum validity filter.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub points: Vec<DesignPoint>,
    pub removed: usize,
}

/// Drops design points whose Ionizable + Cholesterol + PEG shares leave the helper
/// lipid less than `min_helper_pct` of the molar sum. Points missing any of the three
/// percentage factors pass unchanged.
pub fn filter_valid_points(points: Vec<DesignPoint>, min_helper_pct: f64) -> FilterOutcome {
    let has_all_pct = points
        .first()
        .map(|p| p.contains_key(ION_PCT) && p.contains_key(CHOL_PCT) && p.contains_key(PEG_PCT))
        .unwrap_or(false);
    if !has_all_pct {
        return FilterOutcome {
            points,
            removed: 0,
        };
    }
    let n_original = points.len();
    let kept: Vec<DesignPoint> = points
        .into_iter()
        .filter(|p| {
            p[ION_PCT] + p[CHOL_PCT] + p[PEG_PCT] <= 100.0 - min_helper_pct
        })
        .collect();
    let removed = n_original - kept.len();
    if removed > 0 {
        warn!(
            "design space constraint: {} of {} design points removed, lipid shares exceed {}%",
            removed,
            n_original,
            100.0 - min_helper_pct
        );
    }
    FilterOutcome {
        points: kept,
        removed,
    }
}
