//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` on a local HTTP server.

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use std::process::{Command, Stdio};

    use anyhow::{bail, Context, Result};

    const ADDR: &str = "127.0.0.1";
    const PORT: &str = "8000";

    fn run(program: &str, args: &[&str]) -> Result<()> {
        log::info!("running {program} {}", args.join(" "));
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to launch {program}; is it on PATH?"))?;
        if !status.success() {
            bail!("{program} exited with {status}");
        }
        Ok(())
    }

    pub fn main() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        // 1. Compile the crate, then the wasm bundle the page imports.
        run("cargo", &["build", "--release"])?;
        run(
            "wasm-pack",
            &["build", "--release", "--target", "web", "--out-dir", "static/pkg"],
        )?;

        // 2. Serve `static/` until interrupted.
        log::info!("serving http://{ADDR}:{PORT}");
        let mut server = Command::new("python3")
            .args(["-m", "http.server", PORT, "--bind", ADDR, "--directory", "static"])
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to start http server (python3 required)")?;
        let status = server.wait().context("http server crashed")?;
        log::warn!("http server stopped: {status}");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    host::main()
}

#[cfg(target_arch = "wasm32")]
fn main() {}
