pub mod embedding;
pub mod fuzzy;
pub mod lexical;
pub mod normalize;
pub mod semantic;
