// build.rs

fn main() {
    // --- Link against X11 ---
    // Try pkg-config first, which is the standard way to find library linking
    // information on Unix-like systems. If it fails (not installed, or the .pc
    // file is missing), fall back to manually specifying the linker flags.
    //
    // Only Xlib itself is needed: glyphs come from a bitmap atlas and are
    // blitted into a client-side back buffer, so Xft/fontconfig are not used.

    if let Err(err) = pkg_config::probe_library("x11") {
        eprintln!(
            "pkg-config failed for library 'x11' ({}). Falling back to manual linking.",
            err
        );

        println!("cargo:rustc-link-lib=X11");
        println!("cargo:rustc-link-search=/usr/lib");

        eprintln!("Manual linking flags applied. Ensure the X11 development library is installed.");
    } else {
        eprintln!("pkg-config successfully found X11. Linking configured automatically.");
    }
}
