//! Generate `drip_ffi.h` from the `extern "C"` surface into `OUT_DIR`.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("DRIP_FFI_H")
        .with_no_includes()
        .with_sys_include("stdint.h")
        .with_sys_include("stdbool.h")
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("drip_ffi.h"));
        }
        // Header generation is best-effort.
        Err(err) => println!("cargo:warning=cbindgen could not generate drip_ffi.h: {err}"),
    }
}
