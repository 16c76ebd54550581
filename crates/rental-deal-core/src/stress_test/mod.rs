pub mod risk;
pub mod sensitivity;
