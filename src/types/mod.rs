pub mod analysis;
pub mod series;
pub mod signals;
pub mod sync;

pub use analysis::*;
pub use series::*;
pub use signals::*;
pub use sync::*;
