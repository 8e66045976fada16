use crate::DOE::design::{
    BoxBehnken, CentralComposite, CHOL_PCT, create_design_by_name, DesignGenerator,
    DesignMethod, DoeError, FactorRange, filter_valid_points, FractionalFactorial,
    FullFactorial2Level, FullFactorial3Level, ION_DNA_RATIO, ION_PCT, MixtureDesign, PEG_PCT,
    PlackettBurman,
};
use crate::DOE::run_sheet::{RunSheetParams, design_and_run};
use crate::Formulation::components::{FormulationRequest, LipidComponent, NucleicAcidKind};
use approx::assert_relative_eq;

fn screening_factors() -> Vec<FactorRange> {
    vec![
        FactorRange::new(ION_PCT, 45.0, 55.0),
        FactorRange::new(CHOL_PCT, 33.5, 43.5),
        FactorRange::new(PEG_PCT, 0.5, 2.5),
    ]
}

fn base_request() -> FormulationRequest {
    FormulationRequest::new(
        "doe base",
        NucleicAcidKind::PDna,
        3.0,
        1.0,
        10.0,
        vec![
            LipidComponent::new("SM-102", 710.182, 40.0, 50.0),
            LipidComponent::new("DSPC", 790.147, 10.0, 10.0),
            LipidComponent::new("Cholesterol", 386.654, 10.0, 38.5),
            LipidComponent::new("PEG-DMG2000", 2509.2, 10.0, 1.5),
        ],
    )
}

#[test]
fn test_factor_level_mapping() {
    let f = FactorRange::new(ION_PCT, 45.0, 55.0);
    assert_relative_eq!(f.level(-1.0), 45.0, max_relative = 1e-12);
    assert_relative_eq!(f.level(1.0), 55.0, max_relative = 1e-12);
    assert_relative_eq!(f.level(0.0), 50.0, max_relative = 1e-12);
    assert_relative_eq!(f.center(), 50.0, max_relative = 1e-12);
    assert!(FactorRange::new(ION_PCT, 55.0, 45.0).validate().is_err());
}

#[test]
fn test_2level_factorial_counts_and_corners() {
    let points = FullFactorial2Level.generate(&screening_factors()).unwrap();
    assert_eq!(points.len(), 8);
    // last factor varies fastest, first point is the all-low corner
    assert_relative_eq!(points[0][ION_PCT], 45.0, max_relative = 1e-12);
    assert_relative_eq!(points[0][CHOL_PCT], 33.5, max_relative = 1e-12);
    assert_relative_eq!(points[0][PEG_PCT], 0.5, max_relative = 1e-12);
    assert_relative_eq!(points[7][ION_PCT], 55.0, max_relative = 1e-12);
    assert_relative_eq!(points[7][PEG_PCT], 2.5, max_relative = 1e-12);
}

#[test]
fn test_3level_factorial_count() {
    let factors = vec![
        FactorRange::new(ION_PCT, 45.0, 55.0),
        FactorRange::new(PEG_PCT, 0.5, 2.5),
    ];
    let points = FullFactorial3Level.generate(&factors).unwrap();
    assert_eq!(points.len(), 9);
    let centers = points
        .iter()
        .filter(|p| (p[ION_PCT] - 50.0).abs() < 1e-12 && (p[PEG_PCT] - 1.5).abs() < 1e-12)
        .count();
    assert_eq!(centers, 1);
}

#[test]
fn test_fractional_factorial_caps_at_16_deterministically() {
    let factors = vec![
        FactorRange::new(ION_PCT, 45.0, 55.0),
        FactorRange::new(CHOL_PCT, 33.5, 43.5),
        FactorRange::new(PEG_PCT, 0.5, 2.5),
        FactorRange::new(ION_DNA_RATIO, 5.0, 15.0),
        FactorRange::new("Aqueous_Ethanol_Ratio", 2.0, 4.0),
    ];
    let a = FractionalFactorial.generate(&factors).unwrap();
    let b = FractionalFactorial.generate(&factors).unwrap();
    assert_eq!(a.len(), 16);
    assert_eq!(a, b);

    // below the cap the full factorial passes through untouched
    let small = FractionalFactorial.generate(&screening_factors()).unwrap();
    assert_eq!(small.len(), 8);
}

#[test]
fn test_plackett_burman_rows() {
    let points = PlackettBurman.generate(&screening_factors()).unwrap();
    assert_eq!(points.len(), 12);
    for p in &points {
        for (name, lo, hi) in [(ION_PCT, 45.0, 55.0), (CHOL_PCT, 33.5, 43.5), (PEG_PCT, 0.5, 2.5)] {
            assert!(p[name] == lo || p[name] == hi);
        }
    }

    let one_factor = PlackettBurman
        .generate(&[FactorRange::new(ION_PCT, 45.0, 55.0)])
        .unwrap();
    assert_eq!(one_factor.len(), 4);

    let five = vec![
        FactorRange::new("A", 0.0, 1.0),
        FactorRange::new("B", 0.0, 1.0),
        FactorRange::new("C", 0.0, 1.0),
        FactorRange::new("D", 0.0, 1.0),
        FactorRange::new("E", 0.0, 1.0),
    ];
    assert!(matches!(
        PlackettBurman.generate(&five),
        Err(DoeError::TooManyFactors { max: 4, got: 5, .. })
    ));
}

#[test]
fn test_box_behnken_structure() {
    let points = BoxBehnken.generate(&screening_factors()).unwrap();
    assert_eq!(points.len(), 7);
    // first point is the center
    assert_relative_eq!(points[0][ION_PCT], 50.0, max_relative = 1e-12);
    assert_relative_eq!(points[0][CHOL_PCT], 38.5, max_relative = 1e-12);
    assert_relative_eq!(points[0][PEG_PCT], 1.5, max_relative = 1e-12);
    // excursions keep the other factors at center
    assert_relative_eq!(points[1][ION_PCT], 45.0, max_relative = 1e-12);
    assert_relative_eq!(points[1][CHOL_PCT], 38.5, max_relative = 1e-12);
}

#[test]
fn test_central_composite_axial_points() {
    let factors = vec![
        FactorRange::new(ION_PCT, 45.0, 55.0),
        FactorRange::new(PEG_PCT, 0.5, 2.5),
    ];
    let points = CentralComposite.generate(&factors).unwrap();
    // 4 corners + 4 axial + 1 center
    assert_eq!(points.len(), 9);
    let alpha = 2.0f64.sqrt();
    let expected_low = 50.0 - alpha * 5.0 / 2.0;
    let has_axial = points
        .iter()
        .any(|p| (p[ION_PCT] - expected_low).abs() < 1e-9 && (p[PEG_PCT] - 1.5).abs() < 1e-9);
    assert!(has_axial);
}

#[test]
fn test_mixture_design_normalizes() {
    let factors = vec![
        FactorRange::new(ION_PCT, 0.0, 100.0),
        FactorRange::new(CHOL_PCT, 0.0, 100.0),
    ];
    let points = MixtureDesign.generate(&factors).unwrap();
    // 3^2 lattice minus the all-zero point
    assert_eq!(points.len(), 8);
    for p in &points {
        assert_relative_eq!(p[ION_PCT] + p[CHOL_PCT], 100.0, max_relative = 1e-9);
    }
}

#[test]
fn test_filter_removes_overfull_points() {
    let points = FullFactorial2Level.generate(&screening_factors()).unwrap();
    let outcome = filter_valid_points(points, 0.5);
    // only the all-high corner (55 + 43.5 + 2.5 = 101) violates the constraint
    assert_eq!(outcome.removed, 1);
    assert_eq!(outcome.points.len(), 7);
}

#[test]
fn test_filter_passes_points_without_percent_factors() {
    let factors = vec![FactorRange::new(ION_DNA_RATIO, 5.0, 15.0)];
    let points = FullFactorial2Level.generate(&factors).unwrap();
    let outcome = filter_valid_points(points, 0.5);
    assert_eq!(outcome.removed, 0);
    assert_eq!(outcome.points.len(), 2);
}

#[test]
fn test_empty_design_is_an_error() {
    let factors = vec![
        FactorRange::new(ION_PCT, 60.0, 70.0),
        FactorRange::new(CHOL_PCT, 40.0, 50.0),
        FactorRange::new(PEG_PCT, 5.0, 10.0),
    ];
    let method = DesignMethod::FullFactorial2Level(FullFactorial2Level);
    let params = RunSheetParams::new(base_request(), 1, 1);
    assert!(matches!(
        design_and_run(&method, &factors, &params),
        Err(DoeError::EmptyDesign)
    ));
}

#[test]
fn test_run_sheet_ordering_and_ids() {
    let factors = vec![FactorRange::new(ION_DNA_RATIO, 5.0, 15.0)];
    let method = DesignMethod::FullFactorial2Level(FullFactorial2Level);
    let params = RunSheetParams::new(base_request(), 2, 2);
    let sheet = design_and_run(&method, &factors, &params).unwrap();

    assert_eq!(sheet.generated_points, 2);
    assert_eq!(sheet.filtered_points, 2);
    assert_eq!(sheet.runs.len(), 8);
    assert!(sheet.excluded.is_empty());

    let ids: Vec<&str> = sheet.runs.iter().map(|r| r.run_id.as_str()).collect();
    assert_eq!(ids, ["R001", "R002", "R003", "R004", "R005", "R006", "R007", "R008"]);
    let blocks: Vec<u32> = sheet.runs.iter().map(|r| r.block).collect();
    assert_eq!(blocks, [1, 1, 1, 1, 2, 2, 2, 2]);
    let experiments: Vec<usize> = sheet.runs.iter().map(|r| r.experiment).collect();
    assert_eq!(experiments, [1, 1, 2, 2, 1, 1, 2, 2]);
    let replicates: Vec<u32> = sheet.runs.iter().map(|r| r.replicate).collect();
    assert_eq!(replicates, [1, 2, 1, 2, 1, 2, 1, 2]);

    // unvaried percentages fall back to the baseline recipe
    assert_relative_eq!(sheet.runs[0].ionizable_pct, 50.0, max_relative = 1e-12);
    assert_relative_eq!(sheet.runs[0].helper_pct, 10.0, max_relative = 1e-12);
}

#[test]
fn test_run_sheet_np_summary() {
    let factors = vec![FactorRange::new(ION_DNA_RATIO, 5.0, 15.0)];
    let method = DesignMethod::FullFactorial2Level(FullFactorial2Level);
    let params = RunSheetParams::new(base_request(), 1, 1);
    let sheet = design_and_run(&method, &factors, &params).unwrap();

    let (min, mean, max) = sheet.np_summary().unwrap();
    assert_relative_eq!(min, 5.0 * 330.0 / 710.182, epsilon = 1e-9);
    assert_relative_eq!(max, 15.0 * 330.0 / 710.182, epsilon = 1e-9);
    assert_relative_eq!(mean, 10.0 * 330.0 / 710.182, epsilon = 1e-9);
}

#[test]
fn test_infeasible_runs_are_excluded_with_ids() {
    let mut base = base_request();
    for c in &mut base.components {
        c.stock_concentration = 1.0;
    }
    let factors = vec![FactorRange::new(ION_DNA_RATIO, 15.0, 25.0)];
    let method = DesignMethod::FullFactorial2Level(FullFactorial2Level);
    let params = RunSheetParams::new(base, 2, 1);
    let sheet = design_and_run(&method, &factors, &params).unwrap();

    assert!(sheet.runs.is_empty());
    assert_eq!(sheet.excluded.len(), 4);
    assert_eq!(sheet.excluded[0].run_id, "R001");
    assert!(sheet.excluded.iter().all(|r| r.result.ethanol_volume_ul < 0.0));
    assert!(sheet.np_summary().is_none());
}

#[test]
fn test_run_sheet_csv_shape() {
    let factors = vec![FactorRange::new(ION_DNA_RATIO, 5.0, 15.0)];
    let method = DesignMethod::FullFactorial2Level(FullFactorial2Level);
    let params = RunSheetParams::new(base_request(), 1, 1);
    let sheet = design_and_run(&method, &factors, &params).unwrap();

    let csv = sheet.to_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), sheet.runs.len() + 1);
    assert!(lines[0].starts_with("Block,Run_ID,Experiment,Replicate"));
    assert!(lines[0].contains("SM-102_Vol_uL"));
    assert!(lines[1].starts_with("1,R001,1,1"));
}

#[test]
fn test_screening_pipeline_end_to_end() {
    let method = create_design_by_name("Plackett-Burman").unwrap();
    let params = RunSheetParams::new(base_request(), 1, 1);
    let sheet = design_and_run(&method, &screening_factors(), &params).unwrap();

    assert_eq!(sheet.design_name, "Plackett-Burman");
    assert_eq!(sheet.generated_points, 12);
    assert!(sheet.filtered_points <= 12);
    assert_eq!(sheet.runs.len() + sheet.excluded.len(), sheet.filtered_points);
    // helper always absorbs the remainder
    for run in &sheet.runs {
        assert_relative_eq!(
            run.ionizable_pct + run.helper_pct + run.cholesterol_pct + run.peg_pct,
            100.0,
            max_relative = 1e-9
        );
        assert!(run.helper_pct >= 0.5);
    }
}

#[test]
fn test_zero_replicates_rejected() {
    let factors = vec![FactorRange::new(ION_DNA_RATIO, 5.0, 15.0)];
    let method = DesignMethod::FullFactorial2Level(FullFactorial2Level);
    let params = RunSheetParams::new(base_request(), 0, 1);
    assert!(matches!(
        design_and_run(&method, &factors, &params),
        Err(DoeError::Formulation(_))
    ));
}

#[test]
fn test_create_design_by_name() {
    assert!(create_design_by_name("Box-Behnken").is_some());
    assert!(create_design_by_name("Mixture Design").is_some());
    assert!(create_design_by_name("Taguchi").is_none());
}
