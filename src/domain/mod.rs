pub mod types;
pub mod watch;
pub mod policy;
pub mod notification;

pub use types::*;
pub use watch::*;
pub use policy::*;
pub use notification::*;
