//! Push notification adapters
//!
//! Implementations of the NotifierPort trait:
//! - ntfy

pub mod ntfy;

pub use ntfy::NtfyNotifier;
