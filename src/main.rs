//! rpeetracker main entrypoint.

use rpeetracker::run;

fn main() {
    if let Err(e) = run() {
        if !e.is_reported() {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
