//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → cli overrides (flags win over file values)
//!     → validation.rs (semantic checks)
//!     → VerifierConfig (validated, immutable)
//!     → MonitorConfig moved into the Verifier by value
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no process-wide state
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Durations are written as "90s", "5m", "1h30m"

pub mod duration;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{parse_config, read_config, ConfigError};
pub use schema::{MonitorConfig, ObservabilityConfig, SourceConfig, VerifierConfig};
pub use validation::{validate_config, ValidationError};
