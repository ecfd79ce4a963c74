pub mod chart;
pub mod derivatives;
pub mod readings;
pub mod signals;

pub use chart::*;
pub use derivatives::*;
pub use readings::*;
pub use signals::*;
