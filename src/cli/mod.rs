//! CLI command handling

pub mod inbox;
pub mod output;
pub mod route;
pub mod send;
pub mod serve;

pub use inbox::*;
pub use output::*;
pub use route::*;
pub use send::*;
pub use serve::*;
