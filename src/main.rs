#[allow(non_snake_case)]
pub mod DOE;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Formulation;
pub mod history;

use Examples::formulation_examples::formulation_examples;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

pub fn main() {
    TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("logger init failed");
    //
    let task: usize = 0;
    formulation_examples(task);
}
