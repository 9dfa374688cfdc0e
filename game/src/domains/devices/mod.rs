pub use domain::*;
pub use effects::*;
pub use update::*;

mod domain;
mod effects;
mod update;
