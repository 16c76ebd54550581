pub mod offer_grid;
pub mod saved;
