fn main() {
    if let Err(err) = sheetboard::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
