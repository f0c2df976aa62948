pub mod fix;
pub mod state;

pub use fix::*;
pub use state::*;
