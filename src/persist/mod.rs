//! Flat-file persistence: JSON blobs and the PID record.
//!
//! Readers never fail. A missing or unreadable file comes back as `None`
//! (or the caller's default), so callers handle the "nothing stored" case
//! explicitly.

/// Persistence error types.
pub mod error;

/// JSON blob read/write with atomic replace.
pub mod json;

/// PID record helpers and the RAII guard.
pub mod pid;

pub use error::PersistError;
pub use json::{load_json, load_json_or, save_json};
pub use pid::{is_process_running, read_pid, remove_pid, write_pid, PidGuard};
