pub mod columns;
pub mod stream;
pub mod timestamp;

pub use columns::*;
pub use stream::*;
pub use timestamp::*;
