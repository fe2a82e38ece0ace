fn main() {
    if let Err(err) = ferris_barbershop::run() {
        eprintln!("[Barbershop] Exited with error: {}", err);
        std::process::exit(1);
    }
}
