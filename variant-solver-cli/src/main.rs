mod puzzle;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use variant_solver_lib::prelude::*;

#[derive(Debug, Parser)]
#[clap(name = "variant-solver")]
#[clap(about = "Variant Sudoku solving utility.")]
#[clap(author, version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct PuzzleArgs {
    /// JSON puzzle file (size, givens, regions, constraints)
    #[arg(short, long)]
    puzzle: Option<PathBuf>,

    /// Grid size when no puzzle file is given
    #[arg(short, long, default_value_t = 9)]
    size: usize,

    /// Givens as a row-major digit string, 0 or '.' for empty
    #[arg(short, long)]
    givens: Option<String>,

    /// Extra constraint, as name or name:options (repeatable)
    #[arg(short, long = "constraint")]
    constraints: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Find one solution
    Solve {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Pick a random solution instead of the first
        #[arg(long)]
        random: bool,
    },
    /// Check whether the solution is unique
    Unique {
        #[command(flatten)]
        puzzle: PuzzleArgs,
    },
    /// Count solutions up to a cap
    Count {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        /// Stop counting at this many solutions (0 for no cap)
        #[arg(short, long, default_value_t = 2)]
        limit: usize,
    },
    /// Solve with logical deductions only and print the steps
    Logical {
        #[command(flatten)]
        puzzle: PuzzleArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{} {}", "error:".red().bold(), message);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Solve { puzzle, random } => {
            let solver = build(&puzzle)?;
            let outcome = if random {
                solver.find_random_solution()
            } else {
                solver.solve_any()
            };
            match outcome {
                SolveOutcome::Solved(board) => {
                    println!("{}", puzzle::render_grid(&board));
                    Ok(())
                }
                SolveOutcome::None => Err("no solution".to_owned()),
                SolveOutcome::Cancelled => Err("cancelled".to_owned()),
            }
        }
        Command::Unique { puzzle } => {
            let solver = build(&puzzle)?;
            match solver.solve_unique() {
                UniquenessOutcome::Unique(board) => {
                    println!("{}", "unique".green().bold());
                    println!("{}", puzzle::render_grid(&board));
                    Ok(())
                }
                UniquenessOutcome::Multiple => {
                    println!("{}", "multiple solutions".yellow().bold());
                    Ok(())
                }
                UniquenessOutcome::None => Err("no solution".to_owned()),
                UniquenessOutcome::Cancelled => Err("cancelled".to_owned()),
            }
        }
        Command::Count { puzzle, limit } => {
            let solver = build(&puzzle)?;
            match solver.count_solutions(limit) {
                CountOutcome::Exact(count) => {
                    println!("{} solution(s)", count);
                    Ok(())
                }
                CountOutcome::AtLeast(count) => {
                    println!("at least {} solution(s)", count);
                    Ok(())
                }
                CountOutcome::Cancelled(_) => Err("cancelled".to_owned()),
            }
        }
        Command::Logical { puzzle } => {
            let mut solver = build(&puzzle)?;
            let mut trace = StepTrace::new();
            let outcome = solver.logical_solve(&mut trace);
            for (number, step) in trace.iter().enumerate() {
                println!("{:>4}. {}", number + 1, step);
            }
            match outcome {
                LogicalOutcome::Solved => {
                    println!("{}", "solved".green().bold());
                    println!("{}", puzzle::render_grid(solver.board()));
                    Ok(())
                }
                LogicalOutcome::Unsolved => {
                    println!("{}", "out of deductions".yellow().bold());
                    println!("{}", puzzle::render_grid(solver.board()));
                    Ok(())
                }
                LogicalOutcome::Invalid => Err("puzzle is unsolvable".to_owned()),
                LogicalOutcome::Cancelled => Err("cancelled".to_owned()),
            }
        }
    }
}

fn build(args: &PuzzleArgs) -> Result<Solver, String> {
    puzzle::build_solver(
        args.puzzle.as_deref(),
        args.size,
        args.givens.as_deref(),
        &args.constraints,
    )
}
