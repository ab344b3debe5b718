mod balance;
mod journal;
mod line;
mod money;
mod sheet;
mod submission;

pub use balance::*;
pub use journal::*;
pub use line::*;
pub use money::*;
pub use sheet::*;
pub use submission::*;
