pub mod client;
pub mod error;
pub mod request;
pub mod response;
pub mod routes;
pub mod version;

pub use client::*;
pub use error::*;
pub use request::*;
pub use response::*;
pub use version::*;
