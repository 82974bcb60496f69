use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use sqlfront::{Lexer, Query};

const HISTORY_FILE: &str = ".sqlfront_history";

#[derive(Parser)]
#[command(author, version, about = "sqlfront - tokenize and parse SQL queries")]
struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive shell
    Shell,

    /// Print the tokens of a query, one per line
    Tokens {
        /// SQL query to tokenize
        query: String,
    },

    /// Parse a SELECT query and print its tree
    Parse {
        /// SQL query to parse
        query: String,

        /// Print the tree as JSON
        #[arg(long)]
        json: bool,
    },
}

fn print_tokens(query: &str) -> Result<()> {
    let tokens = Lexer::from_query(query).tokenize().context("Failed to read query")?;
    for token in &tokens {
        println!("{}", token);
    }
    println!("({} tokens)", tokens.len());
    Ok(())
}

fn parse_query(query: &str) -> Result<Query> {
    sqlfront::Parser::new()
        .parse_str(query)
        .with_context(|| format!("Failed to parse `{}`", query))
}

fn print_tree(query: &Query, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(query)?);
    } else {
        println!("{:#?}", query);
    }
    Ok(())
}

fn run_shell() -> Result<()> {
    println!("Welcome to sqlfront. Type 'help' for assistance or 'exit' to quit.");

    let mut rl = Editor::<(), DefaultHistory>::new()?;
    if let Err(err) = rl.load_history(HISTORY_FILE) {
        if !err.to_string().contains("No such file or directory") {
            println!("Error loading history: {}", err);
        }
    }

    loop {
        let readline = rl.readline("sqlfront> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);

                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let result = match line.to_lowercase().as_str() {
                    "exit" | "quit" => {
                        println!("Goodbye!");
                        break;
                    }
                    "help" => {
                        print_help();
                        Ok(())
                    }
                    _ => match line.strip_prefix("\\tokens") {
                        Some(query) => print_tokens(query.trim()),
                        None => parse_query(line).and_then(|query| print_tree(&query, false)),
                    },
                };
                if let Err(err) = result {
                    println!("Error: {:#}", err);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {}", err);
                break;
            }
        }
    }

    if let Err(err) = rl.save_history(HISTORY_FILE) {
        println!("Error saving history: {}", err);
    }
    Ok(())
}

fn print_help() {
    println!("Available commands:");
    println!("  SELECT ... FROM <table> ...   - Parse a query and print its tree");
    println!("  \\tokens <query>               - Print the tokens of a query");
    println!();
    println!("Supported SELECT clauses:");
    println!("  LEFT|RIGHT [OUTER] JOIN <table> ON <condition>");
    println!("  WHERE <condition>");
    println!("  GROUP BY <columns>");
    println!("  HAVING <condition>");
    println!("  ORDER BY <column> [ASC|DESC], ...");
    println!();
    println!("Other commands:");
    println!("  help                          - Display this help message");
    println!("  exit                          - Exit the shell");
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Shell) | None => run_shell()?,
        Some(Commands::Tokens { query }) => print_tokens(query)?,
        Some(Commands::Parse { query, json }) => {
            let tree = parse_query(query)?;
            print_tree(&tree, *json)?;
        }
    }

    Ok(())
}
