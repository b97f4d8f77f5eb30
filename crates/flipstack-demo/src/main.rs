#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = flipstack_demo::run_from_env() {
        eprintln!("flipstack-demo: {error}");
        std::process::exit(error.exit_code());
    }
}
