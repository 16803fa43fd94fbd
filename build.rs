// Mirrors the static demo site into `dist/` so it can be published as-is.
use std::{fs, path::Path};

use fs_extra::dir::{copy, CopyOptions};

fn main() {
    println!("cargo:rerun-if-changed=static");

    let static_dir = Path::new("static");
    if !static_dir.exists() {
        return;
    }

    let out_dir = Path::new("dist");
    if out_dir.exists() {
        fs::remove_dir_all(out_dir).ok();
    }
    fs::create_dir_all(out_dir).ok();

    let options = CopyOptions::new().content_only(true).overwrite(true);
    if let Err(err) = copy(static_dir, out_dir, &options) {
        println!("cargo:warning=failed to copy static/ into dist/: {err}");
    }
}
