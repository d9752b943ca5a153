pub mod error;
pub mod patch;
pub mod validation;

// Resource types
pub mod todo;
pub mod user;

pub use error::*;
pub use patch::*;
pub use todo::*;
pub use user::*;
