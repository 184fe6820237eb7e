//! # Warteg Console Entry Point
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Initialize tracing (logging)
//! 3. Load API configuration (file, environment, flags)
//! 4. Build the gateway
//! 5. Dispatch the command

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    warteg_console::run().await
}
