pub mod crud;
pub mod schema;

pub use crud::PipelineCrud;
pub use schema::*;
