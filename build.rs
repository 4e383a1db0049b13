// Copies the static site (page + wasm-pack output in static/pkg) to `dist/`.
use std::path::Path;

use fs_extra::dir::{copy, create_all, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    // recreate dist/ empty
    let out_dir = Path::new("dist");
    if let Err(e) = create_all(out_dir, true) {
        println!("cargo:warning=could not prepare dist/: {e}");
        return;
    }

    let options = CopyOptions::new().content_only(true);
    if let Err(e) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=copying static/ to dist/ failed: {e}");
    }
}
