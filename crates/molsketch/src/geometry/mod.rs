pub mod growth;
pub mod strokes;
