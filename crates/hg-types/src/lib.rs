pub mod value;
pub mod config;
pub mod query;
pub mod measure;
pub mod fidelity;
pub mod space;
pub mod env;
pub mod registry;
pub mod scaling;
pub mod errors;

pub use value::*;
pub use config::*;
pub use query::*;
pub use measure::*;
pub use fidelity::*;
pub use space::*;
pub use env::*;
pub use registry::*;
pub use scaling::*;
pub use errors::*;
