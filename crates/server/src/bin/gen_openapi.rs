use std::process::ExitCode;

use server::openapi::ApiDoc;

fn main() -> ExitCode {
    let base_url = std::env::args().nth(1);
    match ApiDoc::document(base_url.as_deref()).to_pretty_json() {
        Ok(spec) => {
            println!("{spec}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to serialize OpenAPI document: {e}");
            ExitCode::FAILURE
        }
    }
}
