pub mod error;
pub mod molecule;
