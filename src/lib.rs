#[allow(non_snake_case)]
pub mod DOE;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Formulation;
pub mod history;
