//! Host configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies the `ENDPOINT_HOST_*` env overrides.
//!
//! # Module layout
//!
//! - **types** — Public configuration structs (`Config`, `Overrides`).
//! - **raw** — Raw TOML deserialization types; mirror the file shape, kept private.
//! - **load** — Loading logic: `merge_toml`, `load_raw_merged`, `load`,
//!   `load_from`, `expand_home`.

mod load;
mod raw;
mod types;

pub use load::{
    ENV_ENDPOINT_NAME, ENV_LOG_LEVEL, ENV_PROFILES, ENV_SERVICE_NAME, expand_home, load, load_from,
};
pub use types::*;
