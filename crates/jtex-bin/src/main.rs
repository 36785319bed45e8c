use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use jtex::command::Registry;
use jtex::plugin::Provider;
use jtex::vm::Options;
use jtex::warning::Warning;
use jtex_stdlib::header::HeaderOptions;
use jtex_stdlib::loader::DirectoryProvider;

fn main() {
    if let Err(err) = Cli::parse().run() {
        if !err.is_empty() {
            eprintln!("{err}");
        }
        std::process::exit(1);
    }
}

/// Convert JTeX documents to LaTeX.
#[derive(Debug, Parser)]
#[command(name = "jtex", version = "0.1", about, long_about, max_term_width(100))]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn run(self) -> Result<(), String> {
        match self.command {
            Command::Convert(convert) => convert.run(),
            Command::Tokens(tokens) => tokens.run(),
            Command::Commands(commands) => commands.run(),
        }
    }
}

#[derive(Clone, Debug, clap::Subcommand)]
enum Command {
    /// Convert a JTeX file to LaTeX.
    ///
    /// By default the output is written next to the input file with a .tex extension:
    ///
    ///     $ jtex convert path/to/file.jtex
    ///
    /// writes path/to/file.tex.
    /// Unless the document declares its own \documentclass, a header is generated
    ///     and the converted body is placed inside the document environment.
    Convert(Convert),

    /// Print the tokens of a JTeX file, one per line.
    ///
    /// Each line contains the position, the kind and the text of the token.
    Tokens(Tokens),

    /// List the available commands and the operators injected into them.
    Commands(Commands),
}

/// Settings read from a JSON configuration file.
///
/// ```json
/// {
///     "options": {"line_break": "\n", "default_packages": ["amsmath", "amssymb"]},
///     "header": {"document_class": "report", "necessary_packages": ["amsmath"]}
/// }
/// ```
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    options: Options,
    header: HeaderOptions,
}

impl Config {
    fn read(path: &Path) -> Result<Config, String> {
        let data = read_file(path)?;
        serde_json::from_str(&data)
            .map_err(|err| format!("Failed to parse config file {}: {err}", path.display()))
    }
}

#[derive(Clone, Debug, clap::Args)]
struct PluginArgs {
    /// Directory of declarative operator plugins; may be repeated.
    #[arg(short, long = "plugins")]
    plugins: Vec<PathBuf>,

    /// Do not print warnings.
    #[arg(short, long)]
    quiet: bool,
}

impl PluginArgs {
    fn registry(&self) -> Registry {
        let default = jtex_stdlib::plugin();
        let dirs: Vec<DirectoryProvider> = self.plugins.iter().map(DirectoryProvider::new).collect();
        let mut providers: Vec<&dyn Provider> = vec![&default];
        providers.extend(dirs.iter().map(|dir| dir as &dyn Provider));
        let (registry, warnings) = jtex::plugin::load(&providers);
        self.print_warnings(&warnings);
        registry
    }

    fn print_warnings(&self, warnings: &[Warning]) {
        if self.quiet {
            return;
        }
        for warning in warnings {
            eprintln!("{warning}");
        }
    }
}

#[derive(Clone, Debug, Parser)]
struct Convert {
    /// Path to the JTeX file to convert.
    path: PathBuf,

    /// Output path for the LaTeX file.
    ///
    /// Pass - to print the output to standard out.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not generate a header; output only the converted body.
    #[arg(long)]
    no_header: bool,

    /// Path to a JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Document class of the generated header.
    #[arg(long)]
    document_class: Option<String>,

    /// Package the generated header loads if the document does not; may be repeated.
    #[arg(long = "require")]
    necessary_packages: Vec<String>,

    #[command(flatten)]
    plugin_args: PluginArgs,
}

impl Convert {
    fn run(&self) -> Result<(), String> {
        let mut config = match &self.config {
            None => Config::default(),
            Some(path) => Config::read(path)?,
        };
        if let Some(document_class) = &self.document_class {
            config.header.document_class = document_class.clone();
        }
        config
            .header
            .necessary_packages
            .extend(self.necessary_packages.iter().cloned());

        let registry = self.plugin_args.registry();
        let source = read_file(&self.path)?;
        let conversion = match jtex::convert(&source, &registry, &config.options) {
            Ok(conversion) => conversion,
            Err(err) => {
                print_error(&err, &self.path, &source);
                return Err("".into());
            }
        };
        self.plugin_args.print_warnings(&conversion.warnings);

        let output = if self.no_header {
            conversion.output
        } else {
            jtex_stdlib::header::generate_header(&conversion.output, &config.header)
        };
        match self.output_path()? {
            None => {
                println!("{output}");
                Ok(())
            }
            Some(path) => std::fs::write(&path, output)
                .map_err(|err| format!("Failed to write `{}`: {err}", path.display())),
        }
    }

    fn output_path(&self) -> Result<Option<PathBuf>, String> {
        match &self.output {
            Some(path) if path.as_os_str() == "-" => Ok(None),
            Some(path) => Ok(Some(path.clone())),
            None => {
                let path = self.path.with_extension("tex");
                if path == self.path {
                    return Err(format!(
                        "The input file {} already has a .tex extension; pass an output path with -o",
                        self.path.display()
                    ));
                }
                Ok(Some(path))
            }
        }
    }
}

#[cfg(feature = "ariadne")]
fn print_error(err: &jtex::error::Error, path: &Path, source: &str) {
    let file_name = path.display().to_string();
    let cache: (&str, _) = (&file_name, ariadne::Source::from(source));
    if err.ariadne_report(&file_name).eprint(cache).is_err() {
        eprintln!("{err}");
    }
}

#[cfg(not(feature = "ariadne"))]
fn print_error(err: &jtex::error::Error, path: &Path, _: &str) {
    eprintln!("{}", path.display().to_string().bold());
    eprintln!("{err}");
}

#[derive(Clone, Debug, Parser)]
struct Tokens {
    /// Path to the JTeX file.
    path: PathBuf,
}

impl Tokens {
    fn run(&self) -> Result<(), String> {
        let source = read_file(&self.path)?;
        for token in jtex::token::tokenize(&source) {
            let position = token.position();
            println!(
                "{:>4}:{:<4} {:<16} {:?}",
                position.line,
                position.column,
                token.kind().name(),
                token.text()
            );
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Parser)]
struct Commands {
    #[command(flatten)]
    plugin_args: PluginArgs,
}

impl Commands {
    fn run(&self) -> Result<(), String> {
        let registry = self.plugin_args.registry();
        for command in registry.commands() {
            println!(
                "{}  (triggered by {})",
                command.name().bold(),
                command.trigger().name()
            );
            if let Some(doc) = command.doc() {
                println!("    {doc}");
            }
            let parameters: Vec<&str> = command.parameters().iter().map(|p| p.name).collect();
            if !parameters.is_empty() {
                println!("    parameters: {}", parameters.join(", "));
            }
            for op in command.operators() {
                println!("    {} {} on {}", op.category(), op.name(), op.trigger());
            }
        }
        for op in registry.unattached_operators() {
            println!(
                "{} the operator {} targets no registered command",
                "Warning:".yellow().bold(),
                op.name()
            );
        }
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("Failed to read `{}`: {err}", path.display()))
}
