fn main() {
    taintlint::cli::run();
}
