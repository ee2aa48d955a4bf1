pub mod elements;
pub mod valence;
