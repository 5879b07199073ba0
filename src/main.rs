use clap::Parser;
use ownervault::cli::{commands, init_logging, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Set { ref key, ref value } => {
            commands::set::execute(&cli, key, value.as_deref())
        }
        Commands::Get { ref key } => commands::get::execute(&cli, key),
        Commands::List => commands::list::execute(&cli),
        Commands::Delete { ref key, force } => commands::delete::execute(&cli, key, force),
        Commands::Sanitize { ref key } => commands::sanitize_cmd::execute(&cli, key),
        Commands::Inject {
            ref file,
            ref output,
        } => commands::inject::execute(&cli, file, output.as_deref()),
        Commands::Templatize {
            ref file,
            ref output,
        } => commands::templatize::execute(&cli, file, output.as_deref()),
        Commands::Check { ref file } => commands::check::execute(&cli, file),
        Commands::Import {
            ref file,
            ref format,
        } => commands::import_cmd::execute(&cli, file, format.as_deref()),
        Commands::ExportKeys { ref format } => commands::export_keys::execute(&cli, format),
        Commands::Generate { length, ref store } => {
            commands::generate::execute(&cli, length, store.as_deref())
        }
        #[cfg(feature = "audit-log")]
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
    };

    if let Err(e) = result {
        ownervault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
