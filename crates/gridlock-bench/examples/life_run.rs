//! Run a board through the pooled engine and print the result.
//!
//! Usage: `life_run [BOARD_FILE] [STEPS] [WORKERS]`
//!
//! Without a board file a seeded 64x32 random board is used. The board
//! file uses the `W H` header plus `*`/`.` rows format.

use std::env;
use std::fs;
use std::process;

use gridlock_core::Board;
use gridlock_engine::{EngineConfig, GenerationStepper};
use gridlock_test_utils::random_board;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let board = match args.first().map(String::as_str) {
        Some(path) if path != "-" => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("cannot read {path}: {e}");
                process::exit(1);
            });
            text.parse::<Board>().unwrap_or_else(|e| {
                eprintln!("cannot parse {path}: {e}");
                process::exit(1);
            })
        }
        _ => random_board(64, 32, 0.15, 42),
    };
    let steps: u64 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100);
    let workers: Option<usize> = args.get(2).and_then(|s| s.parse().ok());

    println!("=== gridlock life_run ===\n");
    println!(
        "board {}x{}, population {}, {steps} steps",
        board.width(),
        board.height(),
        board.population()
    );

    let config = EngineConfig {
        worker_count: workers,
        ..EngineConfig::default()
    };
    let mut stepper = GenerationStepper::new(config);
    match stepper.run(board, steps) {
        Ok(done) => {
            let r = &done.report;
            println!(
                "{:?} run: {} generations over {} slices, {}/{} threads joined, {} us\n",
                r.path, r.generations, r.slices, r.threads_joined, r.threads_spawned, r.total_us
            );
            print!("{}", done.board);
            println!("\nfinal population {}", done.board.population());
        }
        Err(e) => {
            eprintln!("run failed: {e}");
            process::exit(1);
        }
    }
}
