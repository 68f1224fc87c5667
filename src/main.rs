//! oci2docker - converts OCI runtime bundles into Docker build contexts.
//!
//! This binary stages a Dockerfile and a copy of the bundle's rootfs into a
//! fresh directory ready for `docker build`.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Run CLI and get exit code
    let exit_code = match oci2docker::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_usage() {
                oci2docker::cli::EXIT_USAGE
            } else {
                1
            }
        }
    };

    process::exit(exit_code);
}
