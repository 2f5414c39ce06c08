fn main() {
    println!("cargo::rustc-check-cfg=cfg(asm_generic_ioctl)");

    // Architectures that use the asm-generic _IOC layout: 8 bit nr, 8 bit
    // type, 14 bit size, 2 bit direction.
    let arch = std::env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    match arch.as_str() {
        "x86" | "x86_64" | "arm" | "aarch64" | "riscv32" | "riscv64" | "loongarch64" | "s390x" => {
            println!("cargo::rustc-cfg=asm_generic_ioctl");
        }
        _ => {}
    }
}
