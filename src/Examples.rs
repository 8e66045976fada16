pub mod formulation_examples;
