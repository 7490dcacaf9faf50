//! Reducers: pure state mutation for session actions.
//!
//! Out-of-range values clamp to the nearest bound, never error.

mod session;

pub use session::reduce_session;
