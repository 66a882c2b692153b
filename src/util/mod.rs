pub mod text;
pub mod unicode;
