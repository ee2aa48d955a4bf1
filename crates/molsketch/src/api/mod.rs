pub mod editor;
pub mod types;
