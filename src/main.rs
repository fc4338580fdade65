fn main() {
    if let Err(err) = challenge_tracker_lib::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
