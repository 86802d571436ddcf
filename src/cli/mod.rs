//! # CLI Module
//!
//! Command-line access to the router for trying out patterns and route
//! manifests.
//!
//! ## Commands
//!
//! ### `match`
//!
//! Match one path against one pattern and print the captured parameters:
//!
//! ```bash
//! routegate match --pattern '/users/{id}/files/:' --path /users/7/files/a/b.txt
//! ```
//!
//! ### `resolve`
//!
//! Load a route manifest (see [`crate::manifest`]), dispatch one request
//! through it and print the rendered response. Unmatched requests come back
//! as the 404 envelope, denied ones as the deny status with the
//! "Access denied" envelope:
//!
//! ```bash
//! routegate resolve --routes routes.toml --method GET --path '/secret?token=s3cret'
//! ```
//!
//! ### `routes`
//!
//! Print the installed routes of a manifest, grouped by method:
//!
//! ```bash
//! routegate routes --routes routes.toml
//! ```
//!
//! ## Global options
//!
//! - `--config <FILE>` - router config (also `ROUTEGATE_CONFIG`)
//! - `--log-format json|pretty` - overrides the config file and environment
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, run_cli, Cli, Commands};
