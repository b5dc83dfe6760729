use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Rerun when a shader or texture changes.
    println!("cargo:rerun-if-changed=assets");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    if assets_src.exists() {
        let mut copy_options = CopyOptions::new();
        copy_options.overwrite = true;
        copy_items(&[assets_src], &out_dir, &copy_options)?;
    }
    // Lets the binary find its assets when it is not started from the crate root.
    println!(
        "cargo:rustc-env=QUAD_NGIN_ASSETS={}",
        out_dir.join("assets").display()
    );

    Ok(())
}
