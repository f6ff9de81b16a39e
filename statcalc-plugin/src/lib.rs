//! statcalc Plugin System
//!
//! Provides the `Calculation` trait every statistical operation implements,
//! its metadata, and the registry that looks calculations up by name.

mod traits;
mod registry;
mod context;

pub use traits::{Calculation, CalculationMeta, FieldMeta};
pub use registry::{CalculationRegistry, RegistryError};
pub use context::Inputs;

/// Re-export core types for plugin authors
pub mod prelude {
    pub use crate::{Calculation, CalculationMeta, CalculationRegistry, FieldMeta, Inputs};
    pub use statcalc_core::prelude::*;
}
