//! Host-side helper: `cargo run` builds the wasm journey into `static/pkg`,
//! then serves `static/` locally so the page can be opened in a browser.

use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::{env, thread, time::Duration};

const PORT: u16 = 8000;

fn run(program: &str, args: &[&str]) -> io::Result<ExitStatus> {
    println!("Running {program} {} …", args.join(" "));
    Command::new(program).args(args).status()
}

fn main() -> io::Result<()> {
    // Only meaningful on non-wasm targets.
    if env::var("TARGET").unwrap_or_default() == "wasm32-unknown-unknown" {
        return Ok(());
    }

    match run(
        "wasm-pack",
        &["build", "--release", "--target", "web", "--out-dir", "static/pkg"],
    ) {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Serving whatever is already in static/pkg.");
        }
    }

    println!("Serving the journey at http://127.0.0.1:{PORT} …");
    let port = PORT.to_string();
    let mut server = Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    // Keep process alive while the server runs
    loop {
        if let Some(status) = server.try_wait()? {
            eprintln!("http server exited: {status}");
            return Ok(());
        }
        thread::sleep(Duration::from_secs(1));
    }
}
