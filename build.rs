fn main() {
    // No-op on host builds; emits ESP-IDF link/env directives when the
    // espidf toolchain environment is present.
    embuild::espidf::sysenv::output();
}
