//! Host-side helper: `cargo run` builds the WASM package into `static/pkg`
//! and serves the demo page from `static/`.

use std::process::{Command, ExitCode, Stdio};

use log::{error, info, warn};

const PORT: &str = "8000";

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("building WASM package");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(status) if status.success() => {}
        Ok(_) => {
            error!("wasm-pack finished with errors");
            return ExitCode::FAILURE;
        }
        Err(_) => {
            warn!("wasm-pack not found in PATH; serving whatever static/pkg already holds");
        }
    }

    info!("serving demo at http://127.0.0.1:{PORT}");
    let server = Command::new("python3")
        .args(["-m", "http.server", PORT, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::inherit())
        .status();

    match server {
        Ok(status) if status.success() => ExitCode::SUCCESS,
        Ok(status) => {
            error!("http server exited with {status}");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!("failed to start http server: {err}");
            ExitCode::FAILURE
        }
    }
}
