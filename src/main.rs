use aip_filter::Grammar;
use aip_filter::cli::{self, CheckOptions, CliError};
use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "aipf")]
#[command(about = "aipf - Inspect AIP-160 style filter and order-by strings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a lexer symbol table as JSON
    Symbols {
        #[arg(value_enum)]
        grammar: GrammarArg,
    },

    /// Parse a string and print its canonical form
    Parse {
        text: String,

        /// Parse as an order-by string
        #[arg(long)]
        order_by: bool,
    },

    /// Print the raw tokens of a string as JSON
    Tokens {
        text: String,

        /// Lex with the order-by grammar
        #[arg(long)]
        order_by: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GrammarArg {
    Filter,
    OrderBy,
}

impl From<GrammarArg> for Grammar {
    fn from(arg: GrammarArg) -> Self {
        match arg {
            GrammarArg::Filter => Grammar::Filter,
            GrammarArg::OrderBy => Grammar::OrderBy,
        }
    }
}

fn grammar(order_by: bool) -> Grammar {
    if order_by { Grammar::OrderBy } else { Grammar::Filter }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Symbols { grammar } => print_json(&cli::symbols_to_json(grammar.into())),
        Commands::Parse { text, order_by } => run_parse(text, order_by),
        Commands::Tokens { text, order_by } => {
            cli::tokens_to_json(grammar(order_by), &text).and_then(|tokens| print_json(&tokens))
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_parse(text: String, order_by: bool) -> Result<(), CliError> {
    let options = CheckOptions { text, order_by };
    let parsed = cli::execute_check(&options)?;
    println!("{}", parsed);
    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
