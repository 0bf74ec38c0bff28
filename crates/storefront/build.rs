//! Build script for the storefront crate.
//!
//! Fingerprints the stylesheet so templates can append `?v=<hash>` and the
//! CDN may cache `/static/css/store.css` forever.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/store.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let hash = match fs::read(&css_path) {
        Ok(content) => {
            let digest = format!("{:x}", Sha256::digest(&content));
            digest.chars().take(8).collect::<String>()
        }
        Err(e) => {
            println!("cargo:warning=Could not read store.css: {e}");
            String::new()
        }
    };

    println!("cargo:rustc-env=CSS_HASH={hash}");
}
