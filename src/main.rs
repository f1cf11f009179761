use std::env::args_os;
use std::process::ExitCode;

use metallic_smoothness_packer::{pack_texture_files, CLIParser, PackOutcome};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match pack_texture_files(&arguments) {
        Ok(PackOutcome::Persisted(path)) => {
            println!("Texture packed successfully into '{}'", path.display());
            ExitCode::SUCCESS
        }
        Ok(PackOutcome::Cancelled) => {
            println!("No destination chosen, nothing was written");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Packing failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
