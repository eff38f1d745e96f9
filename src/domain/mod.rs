pub mod case;
pub mod generation;
pub mod json;
pub mod prompt;
