use shelves::error::ShelvesError;

mod cli;

fn main() {
    match cli::run() {
        Ok(()) => {}
        Err(ShelvesError::InputClosed) => {
            eprintln!("Closing... No changes have been saved!");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
