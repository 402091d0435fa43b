//! battstat library - exposes the CLI modules for testing

pub mod errors;
pub mod logging;
pub mod report;
