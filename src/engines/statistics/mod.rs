mod spread;

pub use spread::{param_spread, recent_window};
