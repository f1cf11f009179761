use crate::image::writer::png::CompressionPreset;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;

const DEFAULT_OUTPUT_FILE: &str = "MetallicSmoothness.png";

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_metallic_file_argument(command);
        let command = Self::register_roughness_file_argument(command);
        let command = Self::register_output_file_argument(command);
        let command = Self::register_dry_run_argument(command);
        Self::register_compression_preset_argument(command)
    }

    fn register_metallic_file_argument(command: Command) -> Command {
        command.arg(Self::create_metallic_file_argument())
    }

    fn register_roughness_file_argument(command: Command) -> Command {
        command.arg(Self::create_roughness_file_argument())
    }

    fn register_output_file_argument(command: Command) -> Command {
        command.arg(Self::create_output_file_argument())
    }

    fn register_dry_run_argument(command: Command) -> Command {
        command.arg(Self::create_dry_run_argument())
    }

    fn register_compression_preset_argument(command: Command) -> Command {
        command.arg(Self::create_compression_preset_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    // Sources are optional here so that a missing one is reported as a
    // packing error rather than a usage error.
    fn create_metallic_file_argument() -> Arg {
        arg!(metallic_file: -m --metallic <FILE> "Path to metallic PNG")
            .value_parser(value_parser!(PathBuf))
            .required(false)
    }

    fn create_roughness_file_argument() -> Arg {
        arg!(roughness_file: -r --roughness <FILE> "Path to roughness PNG, red channel is used")
            .value_parser(value_parser!(PathBuf))
            .required(false)
    }

    fn create_output_file_argument() -> Arg {
        arg!(output_file: -o --output <FILE> "Path of the packed PNG file, empty to skip writing")
            .default_value(DEFAULT_OUTPUT_FILE)
            .value_parser(value_parser!(String))
    }

    fn create_dry_run_argument() -> Arg {
        arg!(dry_run: --dry_run "Pack without writing the result").action(ArgAction::SetTrue)
    }

    fn create_compression_preset_argument() -> Arg {
        arg!(compression_preset: -c --compression <PRESET> "PNG compression preset")
            .default_value("Default")
            .value_parser(value_parser!(CompressionPreset))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        let output_file = if Self::extract_dry_run_argument(matches) {
            None
        } else {
            Self::extract_output_file_argument(matches)
        };
        Arguments {
            metallic_file: Self::extract_metallic_file_argument(matches),
            roughness_file: Self::extract_roughness_file_argument(matches),
            output_file,
            compression_preset: Self::extract_compression_preset_argument(matches),
        }
    }

    fn extract_metallic_file_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<PathBuf>("metallic_file").cloned()
    }

    fn extract_roughness_file_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches.get_one::<PathBuf>("roughness_file").cloned()
    }

    fn extract_output_file_argument(matches: &ArgMatches) -> Option<PathBuf> {
        matches
            .get_one::<String>("output_file")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    fn extract_dry_run_argument(matches: &ArgMatches) -> bool {
        matches.get_flag("dry_run")
    }

    fn extract_compression_preset_argument(matches: &ArgMatches) -> CompressionPreset {
        matches
            .get_one::<CompressionPreset>("compression_preset")
            .expect("Compression preset must be provided, but was unset.")
            .to_owned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}
