pub use domain::*;
pub use operations::*;
pub use stages::*;
pub use stress::*;
pub use update::*;

mod domain;
mod operations;
mod stages;
mod stress;
mod update;
