pub mod case_files;
pub mod ollama;
