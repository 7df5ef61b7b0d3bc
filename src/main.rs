fn main() {
    dbnomics_ci::app::cli::run();
}
