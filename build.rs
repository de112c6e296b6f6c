use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    // Models are not checked in; a local assets/ directory is picked up if present.
    println!("cargo:rerun-if-changed=assets");

    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let models = manifest_dir.join("assets");
    if models.is_dir() {
        let paths_to_copy = vec![models];
        copy_items(&paths_to_copy, out_dir, &copy_options)?;
    } else {
        println!("cargo:warning=no assets/ directory, models have to be provided at runtime");
    }

    Ok(())
}
