//! Configuration: environment-driven settings plus the constants
//! (pagination, roles, rate limits, order numbering) shared by every layer.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
