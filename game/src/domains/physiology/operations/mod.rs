pub use apply_irrigation::*;

mod apply_irrigation;
