pub mod errors;
pub mod github;
pub mod logger;
pub mod options;
pub mod tracker;
pub mod triage;
