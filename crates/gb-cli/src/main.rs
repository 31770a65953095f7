fn main() {
    gb_cli::init_logging();
    gb_cli::load_env_file();
    std::process::exit(gb_cli::run_cli_from_args(std::env::args_os()));
}
