//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves `static/` on a local port for trying the card in a browser.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::{Command, ExitCode, Stdio};

    use holocard::logging::{init_logging, LoggingConfig};

    init_logging(LoggingConfig::default());

    let port = std::env::var("HOLOCARD_PORT").unwrap_or_else(|_| "8000".to_owned());

    log::info!("building WASM pkg");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(st) => {
            log::error!("wasm-pack finished with {st}; is the wasm32 target installed?");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            log::warn!("wasm-pack not found in PATH; serving whatever is already in static/pkg");
        }
    }

    log::info!("serving static/ at http://127.0.0.1:{port}");
    let status = Command::new("python3")
        .args(["-m", "http.server", port.as_str(), "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status();

    match status {
        Ok(st) if st.success() => ExitCode::SUCCESS,
        Ok(st) => {
            log::error!("http server exited with {st}");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("failed to start http server: {e}");
            ExitCode::FAILURE
        }
    }
}

// The binary has no meaning on wasm32; the library's start hook is the entry.
#[cfg(target_arch = "wasm32")]
fn main() {}
