use clap::Parser;
use passvault::cli::commands;
use passvault::cli::{load_settings, Cli, Commands};
use passvault::crypto::KeyObfuscator;
use passvault::errors::VaultError;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // One obfuscation key for the whole process.
    let obfuscator = KeyObfuscator::new();

    let result = load_settings().and_then(|settings| match cli.command {
        Commands::Store {
            ref service,
            ref password,
        } => commands::store::execute(&cli, &settings, &obfuscator, service, password.as_deref()),
        Commands::Generate {
            ref service,
            length,
            ref complexity,
        } => commands::generate::execute(
            &cli,
            &settings,
            &obfuscator,
            service,
            length,
            complexity.as_deref(),
        ),
        Commands::Get { ref service, copy } => {
            commands::get::execute(&cli, &settings, &obfuscator, service, copy)
        }
        Commands::Delete { ref service, force } => {
            commands::delete::execute(&cli, &settings, &obfuscator, service, force)
        }
        Commands::List { json } => commands::list::execute(&cli, &settings, &obfuscator, json),
        Commands::Shell => commands::shell::execute(&cli, &settings, &obfuscator),
        Commands::Completions { shell } => commands::completions::execute(shell),
    });

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        if matches!(e, VaultError::InvalidKey) {
            passvault::cli::output::tip("Check the passphrase, or point --vault at a different file.");
        }
        std::process::exit(1);
    }
}

/// Install a stderr `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `-v` raises the level.
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "passvault=info,warn",
        _ => "passvault=debug,warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
