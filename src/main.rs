use std::process::ExitCode;

use clap::{Parser, Subcommand};
use lambda_blc::{
    encode_blc, from_binary, from_bruijn, parse_blc_hex, prelude, to_binary, to_bruijn, Evaluator,
    FreeVariables, Term, DEFAULT_MAX_STEPS,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Lambda(#[from] lambda_blc::Error),
    #[error("could not write json: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn code(&self) -> &'static str {
        match self {
            CliError::Lambda(e) => e.code(),
            CliError::Json(_) => "OutputError",
        }
    }
}

#[derive(Parser)]
#[command(name = "lambda")]
#[command(about = "untyped lambda calculus reducer with de bruijn and blc output")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// reduce a term to normal form (bounded)
    Eval {
        /// term like (λx.xλy.y)
        term: String,
        /// max reduction steps
        #[arg(short, long, default_value_t = DEFAULT_MAX_STEPS)]
        steps: usize,
        /// print the reduction result as json
        #[arg(long)]
        json: bool,
    },
    /// show the de bruijn form of a term
    Bruijn {
        term: String,
        /// how to index free variables
        #[arg(short, long, value_enum, default_value_t = FreeVariables::Reject)]
        free: FreeVariables,
    },
    /// encode a term as blc bits
    Binary {
        term: String,
        #[arg(short, long, value_enum, default_value_t = FreeVariables::Reject)]
        free: FreeVariables,
        /// also print the packed bytes as hex
        #[arg(long)]
        hex: bool,
    },
    /// decode blc from a bit string (0010) or packed hex (0x20)
    Decode {
        input: String,
    },
    /// show a named combinator or church numeral
    Prelude {
        /// term name (identity, true, false, succ, add, pred, s, k, omega, 3, ...)
        name: String,
    },
}

fn print_term(term: &Term) -> lambda_blc::Result<()> {
    let encoded = encode_blc(term)?;
    println!("term: {}", term);
    println!("bits: {}", to_binary(term)?);
    println!("hex:  0x{}", hex::encode(&encoded));
    Ok(())
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Eval { term, steps, json } => {
            let reduction = Evaluator::new().max_steps(steps).reduce(&term)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&reduction)?);
            } else {
                println!("{}", reduction.term);
                if !reduction.normal_form {
                    eprintln!("stopped after {} steps without reaching normal form", reduction.steps);
                }
            }
        }
        Commands::Bruijn { term, free } => {
            println!("{}", Evaluator::new().free_variables(free).bruijn(&term)?);
        }
        Commands::Binary { term, free, hex } => {
            let indexed = Evaluator::new().free_variables(free).to_bruijn(&term)?;
            if hex {
                print_term(&indexed)?;
            } else {
                println!("{}", to_binary(&indexed)?);
            }
        }
        Commands::Decode { input } => {
            let input = input.trim();
            let term = if !input.is_empty() && input.chars().all(|c| c == '0' || c == '1') {
                from_binary(input)?
            } else {
                parse_blc_hex(input)?
            };
            print_term(&term)?;
            match from_bruijn(&term) {
                Ok(named) => println!("named: {}", named),
                Err(e) => println!("named: - ({})", e),
            }
        }
        Commands::Prelude { name } => {
            let term = prelude::resolve(&name.to_lowercase())?;
            println!("named: {}", term);
            print_term(&to_bruijn(&term, FreeVariables::Reject)?)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", e.code(), e);
            if let CliError::Lambda(lambda_blc::Error::UnknownTerm { .. }) = &e {
                eprintln!("available: {}, or a number", prelude::NAMES.join(", "));
            }
            ExitCode::FAILURE
        }
    }
}
