pub mod api;
pub mod cli;
pub mod config;
pub mod directive;
pub mod errors;
pub mod formula;
pub mod grid;
pub mod markers;
pub mod path;
pub mod placeholder;
pub mod runner;
pub mod template;
pub mod workbook;

pub use errors::EngineError;
