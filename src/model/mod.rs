//! Transition curve model.
//!
//! Curves are implemented as small, pure functions so fitting code can call
//! them inside the residual loop without any shared state.

pub mod primitives;
pub mod transition;

pub use primitives::*;
pub use transition::*;
