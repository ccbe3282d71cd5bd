pub mod context;
pub mod ports;
pub mod scheduler;
pub mod usecases;

pub use context::*;
pub use ports::*;
