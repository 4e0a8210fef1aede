pub mod life_stage;
pub mod phenotype;
