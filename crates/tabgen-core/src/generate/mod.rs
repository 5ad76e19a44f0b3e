pub mod engine;
pub mod format;
pub mod plan;
pub mod providers;
pub mod replacements;
pub mod value;
