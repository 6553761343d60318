//! EEG report data model: the six report sections, their partial-update
//! patches and the string enums used to address fields.

pub mod enums;
pub mod patch;
pub mod report;

pub use enums::*;
pub use patch::*;
pub use report::*;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
