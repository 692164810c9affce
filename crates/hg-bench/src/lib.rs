pub mod benchmark;
pub mod catalog;
pub mod description;
pub mod functional;
pub mod surrogate;
pub mod synthetic;
pub mod table;
pub mod tabular;

pub use benchmark::*;
pub use catalog::*;
pub use description::*;
pub use functional::*;
pub use surrogate::*;
pub use synthetic::*;
pub use table::*;
pub use tabular::*;
