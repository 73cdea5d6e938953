use std::env;

fn main() {

    // Only the window display links against SDL2.
    if env::var_os("CARGO_FEATURE_SDL").is_none() {
        return;
    }

    // Assume libsdl2-dev is installed with the package manager on unix family systems.
    // On a windows OS we look for the C built sdl2 libraries in ./sdl_libs unless SDL_LIBS_DIR says otherwise.
    // The `cargo run` command will also look for sdl2 dlls in the same directory.
    if env::var("CARGO_CFG_TARGET_FAMILY").map(|family| family == "windows").unwrap_or(false) {

        let libs_dir = env::var("SDL_LIBS_DIR")
            .ok()
            .or_else(|| env::var("CARGO_MANIFEST_DIR").ok().map(|root| format!("{}/sdl_libs", root)));

        if let Some(libs) = libs_dir {
            println!("cargo:rustc-link-search=native={}", libs);
        }
    }
    println!("cargo:rerun-if-env-changed=SDL_LIBS_DIR");
}
