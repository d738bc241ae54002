//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults fill the gaps)
//!     → validation.rs (semantic checks)
//!     → BuildConfig (validated, immutable)
//!     → shared via Arc with the dev server and the page build
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults, and the defaults are the committed configuration
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    get_configuration, AppType, BuildConfig, BuildOptions, DevServerConfig, HtmlMinifyOptions,
    ProxyRule,
};
pub use validation::{validate_config, ValidationError};
