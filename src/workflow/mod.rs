pub mod copilot;
pub mod interpret;
