//! # Variant Forge Application (Binary)
//!
//! Main executable entry point.

fn main() {
    if let Err(e) = variant_forge_app::main() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
