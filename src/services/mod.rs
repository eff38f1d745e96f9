pub mod case_store;
pub mod language_model;

pub use case_store::CaseStore;
pub use language_model::LanguageModelService;
