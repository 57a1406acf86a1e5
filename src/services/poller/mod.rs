pub mod config;
pub mod engine;
pub mod operation;
pub mod visibility;

pub use config::*;
pub use engine::*;
pub use operation::*;
pub use visibility::*;
