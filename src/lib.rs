pub mod application;
pub mod cli;
pub mod domain;
pub mod io;
pub mod logging;

pub use application::{JournalService, ValidatorConfig};
pub use domain::*;
