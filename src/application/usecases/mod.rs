pub mod handle_trigger;
pub mod poll_cycle;
pub mod register;

pub use handle_trigger::*;
pub use poll_cycle::*;
pub use register::*;
