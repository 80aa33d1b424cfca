use std::env;
use std::path::PathBuf;

// ffmpeg-sys-next finds FFmpeg through pkg-config everywhere except Windows,
// where it needs FFMPEG_DIR. Point at a vcpkg install when one is present.
fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");

    if env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows"
        || env::var_os("FFMPEG_DIR").is_some()
    {
        return;
    }

    let Ok(vcpkg_root) = env::var("VCPKG_ROOT") else {
        println!("cargo:warning=ytframes: set FFMPEG_DIR to your FFmpeg install to build on Windows.");
        return;
    };

    let candidate = PathBuf::from(vcpkg_root)
        .join("installed")
        .join(env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string()));
    if candidate.exists() {
        println!(
            "cargo:warning=ytframes: found FFmpeg at {}; set FFMPEG_DIR to it.",
            candidate.display()
        );
    } else {
        println!(
            "cargo:warning=ytframes: VCPKG_ROOT has no FFmpeg at {}.",
            candidate.display()
        );
    }
}
