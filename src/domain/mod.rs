// Domain module: scheduling model, program model, reports and contracts

pub mod error;
pub mod insights;
pub mod models;
pub mod scheduling;
pub mod solution;
pub mod solver_service;
pub mod validation;
pub mod value_objects;

pub use error::*;
pub use insights::*;
pub use models::*;
pub use scheduling::*;
pub use solution::*;
pub use solver_service::*;
pub use value_objects::*;
