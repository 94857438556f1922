use std::process;

fn main() {
    match cook_annotate_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("cook-annotate error: {err}");
            process::exit(1);
        }
    }
}
