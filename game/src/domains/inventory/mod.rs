pub use domain::*;
pub use lots::*;
pub use update::*;

mod domain;
mod lots;
mod update;
