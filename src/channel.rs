mod args;
#[allow(clippy::module_inception)]
mod channel;
/// Fixed literals of the APC console dialect, plus channel defaults.
pub mod constants;
mod handshake;
/// Compiled patterns for prompts, result codes and outlet status lines.
pub mod patterns;
mod read_until;
mod state;
mod util;
mod write;

pub use args::Args;
pub use channel::Channel;
pub use read_until::Expectation;
pub use state::SessionState;
