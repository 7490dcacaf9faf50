pub mod music;
pub mod session;

pub use music::*;
pub use session::*;
