use crate::Formulation::units::{FormulationError, check_positive};
use serde::{Deserialize, Serialize};

/// Average molecular weight per phosphate group, ug/umol. For dsDNA this is half of the
/// 660 g/mol base-pair mass (each pair carries 2 phosphates); for ssRNA it is the
/// 330 g/mol per-nucleotide mass (1 phosphate each). Both nucleic acid kinds therefore
/// share the same mass/330 convention.
pub const PHOSPHATE_MW: f64 = 330.0;

/// N/P calculation result. The intermediate amine and phosphate moles are kept so that
/// callers can display them next to the ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpRatio {
    /// Molar ratio of amine groups (N) to phosphate groups (P).
    pub ratio: f64,
    /// Amine moles, umol.
    pub amine_umol: f64,
    /// Phosphate moles, umol.
    pub phosphate_umol: f64,
}

/// Computes the N/P ratio of a formulation from the nucleic acid mass (ug) and the
/// ionizable lipid moles (umol).
///
/// When the nucleic acid mass is zero the ratio is reported as 0 rather than raised as
/// an error: "no phosphate" means "no ratio", and callers always display a number.
pub fn np_ratio(
    nucleic_acid_mass_ug: f64,
    ionizable_lipid_moles_umol: f64,
    amines_per_molecule: f64,
) -> NpRatio {
    let phosphate_umol = (nucleic_acid_mass_ug * 1e-6 / PHOSPHATE_MW) * 1e6;
    let amine_umol = ionizable_lipid_moles_umol * amines_per_molecule;
    let ratio = if phosphate_umol > 0.0 {
        amine_umol / phosphate_umol
    } else {
        0.0
    };
    NpRatio {
        ratio,
        amine_umol,
        phosphate_umol,
    }
}

/// Converts a target N/P ratio into the equivalent ionizable-lipid-to-nucleic-acid mass
/// ratio (ug lipid per ug nucleic acid):
///
/// `ratio = (NP * MW_ionizable) / (amines_per_molecule * 330)`
pub fn mass_ratio_from_np(
    target_np: f64,
    ionizable_mw: f64,
    amines_per_molecule: f64,
) -> Result<f64, FormulationError> {
    check_positive("target N/P ratio", target_np)?;
    check_positive("ionizable lipid molecular weight", ionizable_mw)?;
    check_positive("amines per molecule", amines_per_molecule)?;
    Ok((target_np * ionizable_mw) / (amines_per_molecule * PHOSPHATE_MW))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matches_closed_form() {
        for &(mass, n, a) in &[(3.0, 30.0, 1.0), (100.0, 1.2121212, 1.0), (10.0, 0.5, 2.5)] {
            let np = np_ratio(mass, n, a);
            assert_relative_eq!(np.ratio, a * n / (mass / 330.0), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_worked_example_np_4() {
        // 100 ug DNA at N/P = 4: P ~ 0.303 umol, N ~ 1.212 umol
        let np = np_ratio(100.0, 1.2121212, 1.0);
        assert_relative_eq!(np.phosphate_umol, 0.30303, epsilon = 1e-5);
        assert_relative_eq!(np.amine_umol, 1.21212, epsilon = 1e-5);
        assert_relative_eq!(np.ratio, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_phosphate_reports_zero() {
        let np = np_ratio(0.0, 10.0, 1.0);
        assert_eq!(np.ratio, 0.0);
        assert_eq!(np.phosphate_umol, 0.0);
        assert_eq!(np.amine_umol, 10.0);

        let np = np_ratio(3.0, 0.0, 1.0);
        assert_eq!(np.ratio, 0.0);
    }

    #[test]
    fn test_mass_ratio_from_np() {
        // SM-102 at N/P = 4 with one amine per molecule
        let r = mass_ratio_from_np(4.0, 710.182, 1.0).unwrap();
        assert_relative_eq!(r, 4.0 * 710.182 / 330.0, max_relative = 1e-12);
        assert_relative_eq!(r, 8.6082, epsilon = 1e-4);

        assert!(mass_ratio_from_np(0.0, 710.182, 1.0).is_err());
        assert!(mass_ratio_from_np(4.0, 710.182, 0.0).is_err());
    }
}
