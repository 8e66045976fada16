use thiserror::Error;

/// Errors produced by formulation calculations. Validation is fail-fast: every variant
/// is raised before any volume arithmetic happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormulationError {
    #[error("{field} must be positive, got {value}")]
    InvalidParameter { field: String, value: f64 },
    #[error("molar percent of '{name}' must be within [0, 100], got {value}")]
    PercentOutOfRange { name: String, value: f64 },
    #[error("ionizable lipid molar percent is zero; it is the scaling pivot and must be > 0")]
    ZeroIonizablePercent,
    #[error("lipid molar percents must sum to 100, got {sum}")]
    MolarSumMismatch { sum: f64 },
    #[error("a formulation needs 4 or 5 lipid components, got {count}")]
    ComponentCount { count: usize },
}

pub(crate) fn check_positive(field: &str, value: f64) -> Result<(), FormulationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(FormulationError::InvalidParameter {
            field: field.to_string(),
            value,
        })
    }
}

/// Converts mass (ug) to molar amount (umol) via molecular weight (ug/umol).
pub fn moles(mass_ug: f64, mw: f64) -> Result<f64, FormulationError> {
    check_positive("molecular weight", mw)?;
    Ok(mass_ug / mw)
}

/// Converts molar amount (umol) to mass (ug) via molecular weight (ug/umol).
pub fn mass(moles_umol: f64, mw: f64) -> Result<f64, FormulationError> {
    check_positive("molecular weight", mw)?;
    Ok(moles_umol * mw)
}

/// Converts mass (ug) to pipetting volume (uL) via stock concentration (ug/uL).
pub fn volume(mass_ug: f64, stock_conc_ug_per_ul: f64) -> Result<f64, FormulationError> {
    check_positive("stock concentration", stock_conc_ug_per_ul)?;
    Ok(mass_ug / stock_conc_ug_per_ul)
}
