/// eng
/// Core formulation machinery for lipid nanoparticle (LNP) preparation. The module takes
/// the target nucleic acid scale, the ionizable-lipid-to-nucleic-acid mass ratio (given
/// directly or derived from a target N/P ratio), the molar percentages of 4-5 lipid
/// components and their stock concentrations, and produces the following data:
/// 1) mass, moles and pipetting volume of every lipid component
/// 2) ethanol fill, citrate buffer, water and nucleic acid stock volumes for both phases
/// 3) the N/P ratio of the resulting formulation
pub mod engine;
/// Pure conversions between mass (ug), molar amount (umol) and volume (uL) via molecular
/// weight and stock concentration. All other modules build on these.
pub mod units;
/// N/P ratio calculator: amine moles from the ionizable lipid against phosphate moles
/// from the nucleic acid mass (mass/330 convention for both dsDNA and ssRNA).
pub mod np_ratio;
/// Request and component value types with up-front validation (positivity, molar
/// percentages summing to 100, non-zero ionizable pivot).
pub mod components;
/// Reference formulations of FDA-approved LNP products (Onpattro, Spikevax, Comirnaty)
/// as pre-filled component sets.
pub mod presets;
/// Bulk scaling of a single-batch recipe with asymmetric pipetting-overage margins
/// (lipids/ethanol x1.5, aqueous components x1.2).
pub mod bulk;
