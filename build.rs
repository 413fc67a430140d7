// Build script that mirrors static/ into dist/. The wasm bundle itself is
// produced by `cargo run` (see src/main.rs) since wasm-pack re-enters cargo.
use std::{fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    if let Err(err) = fs::create_dir_all(out_dir) {
        println!("cargo:warning=cannot create dist/: {err}");
        return;
    }

    let static_dir = Path::new("static");
    if static_dir.exists() {
        let options = CopyOptions {
            content_only: true,
            overwrite: true,
            ..CopyOptions::new()
        };
        if let Err(err) = copy(static_dir, out_dir, &options) {
            println!("cargo:warning=copying static/ failed: {err}");
        }
    }
}
