#![deny(clippy::all)]
#![deny(clippy::cargo)]
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::nursery)]
#![deny(clippy::pedantic)]
#![deny(clippy::perf)]
#![deny(clippy::style)]
#![deny(clippy::suspicious)]
#![deny(missing_docs)]
#![warn(clippy::multiple_crate_versions)]
// restriction is wild, but some good things for consistency in there, rather would allow things
// explicitly so any new lints pop up and annoy if they get added and then can decide to keep or
// ditch them!
#![warn(clippy::restriction)]
#![allow(clippy::implicit_return)]
#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::question_mark_used)]
#![allow(clippy::separated_literal_suffix)]
#![allow(clippy::missing_inline_in_public_items)]
#![allow(clippy::exhaustive_enums)]
#![allow(clippy::exhaustive_structs)]
#![allow(clippy::self_named_module_files)]
#![allow(clippy::multiple_inherent_impl)]
#![allow(clippy::partial_pub_fields)]
#![allow(clippy::default_numeric_fallback)]
#![allow(clippy::blanket_clippy_restriction_lints)]
#![allow(clippy::std_instead_of_core)]
#![allow(clippy::multiple_unsafe_ops_per_block)]
#![allow(clippy::single_char_lifetime_names)]
#![allow(clippy::missing_trait_methods)]
#![allow(clippy::as_conversions)]
#![allow(clippy::shadow_unrelated)]
#![allow(clippy::unwrap_in_result)]
#![allow(clippy::pub_use)]
#![allow(clippy::arithmetic_side_effects)]

//! apcrs drives the telnet console of an APC power distribution unit -- log in, switch, reboot
//! or query outlets, log out -- while holding a host wide lock so only one process talks to the
//! device at a time.

/// The one operation an `apc` invocation performs.
pub mod action;

/// Channel is the object that consumes from and writes to apcrs transports -- it runs the login
/// handshake and the pattern waits. The channel should generally only be interacted with by the
/// driver.
pub mod channel;

/// The APC console's numbered result codes.
pub mod codes;

/// Configuration loading: defaults, yaml file, environment lookups.
pub mod config;

/// The apcrs driver is the primary object users work with: it knows the outlet commands.
pub mod driver {
    /// The driver builder package, ya know, for building driver stuff.
    pub mod builder;

    /// The console commands and their rendering.
    pub mod commands;

    /// The actual driver package itself.
    #[allow(clippy::module_inception)]
    pub mod driver;

    /// The driver builder re-exported for convenience.
    pub use crate::driver::builder::Builder;

    /// The driver re-exported for convenience.
    pub use crate::driver::driver::Driver;
}

/// apcrs errors.
pub mod errors;

/// The session lock serializing access to the device across processes.
pub mod lock;

/// Reporting outcomes and progress to the operator.
pub mod notifier;

/// Outlet addressing.
pub mod outlet;

/// Module containing the apcrs "response" objects -- that is, objects that are returned from
/// driver operations.
pub mod response;

/// Scoped lock + connection handling with guaranteed teardown.
pub mod session;

/// Transport module holds the base transport and any transport implementations.
pub mod transport {
    /// Base transport module providing trait that all transports must implement.
    pub mod base;

    /// The "system" (/usr/bin/telnet wrapper) transport implementation.
    pub mod system;
}

/// apcrs utilities.
pub(crate) mod util {
    /// Vendor'd ptyprocess form rexpect with extra love for non blocking fd.
    pub(crate) mod ptyprocess;
}
