// File: crates/pulse-core/build.rs
// Summary: Links Windows system libraries that Skia/ICU need for the raster painter.

fn main() {
    #[cfg(target_os = "windows")]
    {
        // RegOpenKeyExW, RegQueryInfoKeyW (font manager lookups)
        println!("cargo:rustc-link-lib=advapi32");
    }
}
