//! Shared test fixtures for SolverForge crates.
//!
//! This crate provides fact types and helpers for testing.
//! It does NOT depend on `solverforge-network` to avoid circular dependencies.
//!
//! - [`roster`] - Shift rostering facts (shifts, employees, managers, unavailability)
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! solverforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use solverforge_test::roster::{Employee, Roster, Shift};
//!
//! let shift = Roster::shift(Shift::new(1, Some(7)).at(8, 12));
//! let ada = Roster::employee(Employee::new(7, "Ada"));
//! assert_eq!(shift.as_shift().hours, 4);
//! assert_eq!(ada.as_employee().name, "Ada");
//! ```

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

pub mod roster;

pub use roster::{Employee, Roster, RosterId, Shift, Unavailability};

static INIT: OnceLock<()> = OnceLock::new();

/// Installs a test-friendly tracing subscriber once per process.
///
/// Defaults to `solverforge_network=debug`; `RUST_LOG` overrides it.
pub fn init_test_logging() {
    INIT.get_or_init(|| {
        let filter = EnvFilter::builder()
            .with_default_directive("solverforge_network=debug".parse().unwrap())
            .from_env_lossy();

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
