//! Command-line interface (CLI) for the bundled rewriting demos.
//!
//! Lists the demos, prints their programs, or runs one to its fixpoint and
//! prints the resulting program. Set `RUST_LOG=trace` to watch individual
//! rewrites.

use clap::{Parser as ClapParser, Subcommand};
use trl_arith::{ArithError, demos};
use trl_interpreter::{InterpreterConfig, InterpreterError};

#[derive(ClapParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Command
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Lists the demos
    List {},
    /// Prints the program of a demo
    Show {
        /// Demo name
        name: String,
    },
    /// Runs a demo to its fixpoint
    Run {
        /// Demo name
        name: String,
        /// Maximum number of rewrite steps
        #[arg(short, long, default_value_t = 100)]
        max_steps: usize,
        /// Maximum number of unification branches per match
        #[arg(long)]
        max_branches: Option<usize>,
        /// Prints the execution cache after every step
        #[arg(short, long)]
        trace: bool,
    },
}

fn main() -> Result<(), ArithError> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Commands::List {} => {
            for demo in demos::DEMOS {
                println!("{:<8} {}", demo.name, demo.description);
            }
        }
        Commands::Show { name } => {
            print!("{}", demos::find(&name)?.program());
        }
        Commands::Run {
            name,
            max_steps,
            max_branches,
            trace,
        } => {
            let demo = demos::find(&name)?;
            let mut config = InterpreterConfig::default();
            if let Some(limit) = max_branches {
                config = config.with_max_unification_branches(limit);
            }
            let mut interpreter = demo.interpreter(config)?;
            for message in interpreter.messages() {
                eprintln!("{message}");
            }
            if interpreter.has_errors() {
                let messages = interpreter.messages().to_vec();
                return Err(InterpreterError::InvalidProgram(messages).into());
            }

            let steps = if trace {
                let mut steps = 0;
                while steps < max_steps && interpreter.execute_rewrite_step() {
                    steps += 1;
                    println!("step {steps}:");
                    for term in interpreter.cache_terms() {
                        println!("  {term}");
                    }
                }
                steps
            } else {
                interpreter.run_to_fixpoint(max_steps)?
            };
            println!("% {steps} step(s)");
            print!("{}", interpreter.get_current_rewrite_result().program);
        }
    }

    Ok(())
}
