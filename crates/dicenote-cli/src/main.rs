// ABOUTME: Command-line interface for the dicenote dice roller.
// ABOUTME: Rolls one expression from the arguments or runs an interactive prompt.

use clap::Parser;
use dicenote::limits::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_DICE, DEFAULT_MAX_OPERATORS};
use dicenote::{EvaluationReport, FastRng, Limits};
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(name = "dicenote")]
#[command(about = "Evaluate arithmetic with dice rolls, e.g. \"4d8 k3h - 1d4 rr2\"")]
#[command(version)]
struct Cli {
    /// Dice expression (e.g., "2d6 k1h + 3"); starts a prompt when omitted.
    /// Put a leading sign on a roll after `--`, as in `dicenote -- -1d4`
    #[arg(allow_negative_numbers = true)]
    notation: Vec<String>,

    /// Output reports as JSON
    #[arg(long)]
    json: bool,

    /// Seed the dice for reproducible rolls
    #[arg(long)]
    seed: Option<u64>,

    /// Deepest nesting of parentheses and signs
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Most dice a single roll may ask for
    #[arg(long, default_value_t = DEFAULT_MAX_DICE)]
    max_dice: u32,

    /// Most binary operators one expression may contain
    #[arg(long, default_value_t = DEFAULT_MAX_OPERATORS)]
    max_operators: usize,
}

fn main() {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let limits = Limits {
        max_depth: cli.max_depth,
        max_dice: cli.max_dice,
        max_operators: cli.max_operators,
    };
    let mut rng = match cli.seed {
        Some(seed) => FastRng::with_seed(seed),
        None => FastRng::new(),
    };

    if cli.notation.is_empty() {
        if let Err(e) = interactive(&mut rng, &limits, cli.json) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    let input = cli.notation.join(" ");
    log::debug!("evaluating {:?}", input);
    match dicenote::roll_with_limits(&input, &mut rng, &limits) {
        Ok(report) => print_report(&report, cli.json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Evaluate one line at a time until an empty line or end of input.
fn interactive(rng: &mut FastRng, limits: &Limits, json: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("roll> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            return Ok(());
        }

        log::debug!("evaluating {:?}", input);
        match dicenote::roll_with_limits(input, rng, limits) {
            Ok(report) => print_report(&report, json),
            Err(e) => eprintln!("Error: {}", e),
        }
    }
}

fn print_report(report: &EvaluationReport, json: bool) {
    if !json {
        println!("{}", report);
        return;
    }

    match serde_json::to_string_pretty(report) {
        Ok(output) => println!("{}", output),
        Err(e) => eprintln!("Error: {}", e),
    }
}
