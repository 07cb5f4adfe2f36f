pub mod analysis;
pub mod error;
pub mod labels;
pub mod validation;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_support;

pub use analysis::*;
pub use error::{InspectError, InspectResult};
pub use labels::*;
pub use validation::*;
