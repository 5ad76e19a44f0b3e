pub mod config;
pub mod error;
pub mod generate;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod registry;

// Re-export key types for convenience
pub use error::{Result, TabgenError};
pub use generate::engine::ColumnGenerator;
pub use generate::plan::{ColumnSpec, GenRule, TableSpec};
pub use generate::replacements::Replacements;
pub use registry::{TableBuffer, TableRegistry};
