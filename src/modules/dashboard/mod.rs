pub mod crud;
pub mod model;
pub mod watcher;

pub use crud::DashboardCrud;
pub use model::*;
pub use watcher::{DashboardSnapshot, DashboardState, DashboardWatcher};
