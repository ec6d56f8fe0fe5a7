use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use rayon::prelude::*;
use spellmark::cli::check::FileCheck;
use spellmark::cli::output::{self, FileReport, OutputFormat};
use spellmark::cli::review;
use spellmark::config::Overrides;
use spellmark::{Config, DictionaryDir, DictionarySource, HighlightStrategy, SpellChecker, UserDictionary};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "spellmark")]
#[command(version, about = "Spell-check files and show every misspelled word in place", long_about = None)]
struct Cli {
    /// Files to check
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    /// Language/dictionary to use (e.g., en_US, en_GB)
    #[arg(short, long)]
    language: Option<String>,

    /// Directory holding <LANG>.dict or <LANG>.txt dictionaries
    #[arg(long, env = "SPELLMARK_DICT_DIR")]
    dict_dir: Option<PathBuf>,

    /// Personal dictionary file
    #[arg(long)]
    personal_dict: Option<PathBuf>,

    /// How flagged words are located in the text (pattern, tokens)
    #[arg(long)]
    highlight: Option<HighlightStrategy>,

    /// Output format (text, json)
    #[arg(short = 'o', long, default_value = "text")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Exit with code 0 even if errors are found
    #[arg(long)]
    no_fail: bool,

    /// Review each misspelled word: skip, ignore or add to the personal dictionary
    #[arg(short, long)]
    interactive: bool,

    /// Add words to personal dictionary
    #[arg(long)]
    add_to_dict: Vec<String>,

    /// Log what the checker is doing (SPELLMARK_LOG overrides)
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completion: Option<Shell>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Dictionary management
    Dict {
        #[command(subcommand)]
        action: DictCommands,
    },
    /// Suggest corrections for a word
    Suggest {
        word: String,
    },
}

#[derive(Parser, Debug)]
enum DictCommands {
    /// List installed dictionaries
    List,
    /// Compile a word list (one word per line) into a dictionary
    Build {
        wordlist: PathBuf,
        /// Language code (e.g., en_US, en_GB, fr_FR)
        language: String,
    },
    /// Show dictionary info
    Info {
        /// Language code
        language: String,
    },
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "spellmark", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(Overrides {
        language: cli.language.clone(),
        personal_dictionary: cli.personal_dict.clone(),
        dictionary_dir: cli.dict_dir.clone(),
        highlight: cli.highlight,
    })?;

    let store = DictionaryDir::new(
        config
            .dictionary_dir
            .clone()
            .context("Failed to determine dictionary directory")?,
    )
    .with_max_suggestions(config.max_suggestions);
    let user_dictionary = UserDictionary::shared(
        config
            .personal_dictionary
            .clone()
            .context("Failed to determine personal dictionary path")?,
    );
    let colored = !cli.no_color;

    match cli.command.take() {
        Some(Commands::Dict { action }) => return handle_dict(action, &store, colored),
        Some(Commands::Suggest { word }) => {
            return suggest(&word, &config, &store, user_dictionary, colored)
        }
        None => {}
    }

    for word in &cli.add_to_dict {
        user_dictionary.add(word);
    }

    if cli.files.is_empty() {
        if !cli.add_to_dict.is_empty() {
            return Ok(());
        }
        anyhow::bail!("No files specified. Use --help for usage information.");
    }

    let store: Arc<dyn DictionarySource> = Arc::new(store);
    let total_flagged = if cli.interactive {
        check_interactive(&cli, &config, store, user_dictionary, colored)?
    } else {
        check_parallel(&cli, &config, store, user_dictionary, colored)?
    };

    if cli.format == OutputFormat::Text {
        output::print_check_summary(total_flagged, &cli.files, colored);
    }

    if total_flagged > 0 && !cli.no_fail {
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("SPELLMARK_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("spellmark=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Every file gets its own session; all of them share one user dictionary.
fn check_parallel(
    cli: &Cli,
    config: &Config,
    store: Arc<dyn DictionarySource>,
    user_dictionary: Arc<UserDictionary>,
    colored: bool,
) -> Result<usize> {
    let reports: Vec<Result<FileReport>> = cli
        .files
        .par_iter()
        .map(|path| {
            let check = FileCheck::open(path, config, store.clone(), user_dictionary.clone())?;
            let report = check.report();
            check.finish();
            Ok(report)
        })
        .collect();

    let mut checked = Vec::with_capacity(reports.len());
    for (path, report) in cli.files.iter().zip(reports) {
        match report {
            Ok(report) => checked.push(report),
            Err(e) => eprintln!("Error: {}: {:#}", path.display(), e),
        }
    }

    output::print_reports(&checked, colored, cli.format)?;
    Ok(checked.iter().map(FileReport::flagged).sum())
}

fn check_interactive(
    cli: &Cli,
    config: &Config,
    store: Arc<dyn DictionarySource>,
    user_dictionary: Arc<UserDictionary>,
    colored: bool,
) -> Result<usize> {
    let mut total = 0;

    for path in &cli.files {
        let check = match FileCheck::open(path, config, store.clone(), user_dictionary.clone()) {
            Ok(check) => check,
            Err(e) => {
                eprintln!("Error: {}: {:#}", path.display(), e);
                continue;
            }
        };

        let report = check.report();
        output::print_text_report(&report, colored);
        let (remaining, quit) = review::review(&check, &report, colored)?;
        check.finish();

        total += remaining;
        if quit {
            break;
        }
    }

    Ok(total)
}

fn suggest(
    word: &str,
    config: &Config,
    store: &DictionaryDir,
    user_dictionary: Arc<UserDictionary>,
    colored: bool,
) -> Result<()> {
    let dictionary = store.open(&config.language)?;
    if !user_dictionary.ensure_loaded() {
        eprintln!(
            "Warning: could not read personal dictionary {}",
            user_dictionary.path().display()
        );
    }

    let checker = SpellChecker::new(dictionary, user_dictionary);
    output::print_suggestions(word, checker.suggest(word).as_deref(), colored);
    Ok(())
}

fn handle_dict(action: DictCommands, store: &DictionaryDir, colored: bool) -> Result<()> {
    match action {
        DictCommands::List => {
            let infos = store.list()?;
            output::print_dictionaries(&infos, store.root(), colored);
        }
        DictCommands::Build { wordlist, language } => {
            let info = store.install_wordlist(&wordlist, &language)?;
            println!(
                "✓ Dictionary installed: {} ({} words)",
                info.path.display(),
                info.word_count
            );
        }
        DictCommands::Info { language } => {
            let info = store.info(&language)?;
            output::print_dictionary_info(&language, info.as_ref(), colored);
        }
    }
    Ok(())
}
