// Build and run failures are reported with the runtime's error type.
pub use sigcli_runtime::{Error, Result};
