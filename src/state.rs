//! Persisted per-package state.
//!
//! ```text
//! <state-dir>/
//!   .lock
//!   yay/
//!     lastchecked  lastbuild  lastsuccess  lastfailed  lastmaintainer
//!     log/20260101-120000.log
//!     work/
//! ```

pub mod io;
pub mod types;

pub use io::{PackageState, RootLock, StateRoot, acquire_root_lock};
pub use types::{StateKey, Watermarks};
