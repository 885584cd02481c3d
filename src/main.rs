use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use minesweeper::{
    data::{GameParams, Pos},
    error::GameError,
    logic::{Game, RevealOutcome},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "minesweeper", about = "Terminal minesweeper on a 9x9 grid", version)]
struct Args {
    /// Board width
    #[arg(long, default_value_t = 9)]
    width: usize,
    /// Board height
    #[arg(long, default_value_t = 9)]
    height: usize,
    /// Number of mines; prompted for interactively when omitted
    #[arg(long)]
    mines: Option<usize>,
    /// RNG seed for reproducible boards
    #[arg(long)]
    seed: Option<u64>,
}

fn read_line(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    let bytes = input.read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn prompt_mine_count(input: &mut impl BufRead, cells: usize) -> io::Result<Option<usize>> {
    loop {
        println!("How many mines do you want on the field?");
        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match line.trim().parse::<usize>() {
            Ok(count) if count <= cells => return Ok(Some(count)),
            Ok(count) => println!("{count} mines do not fit on {cells} cells."),
            Err(_) => println!("Please enter a number."),
        }
    }
}

fn print_field(game: &Game, width: usize, height: usize) {
    let columns: String = (1..=width).map(|x| (b'0' + (x % 10) as u8) as char).collect();
    let rule = "-".repeat(width);
    println!(" |{columns}|");
    println!("-|{rule}|");
    for y in 0..height {
        println!("{}|{}|", y + 1, game.render_row(y));
    }
    println!("-|{rule}|");
}

/// Parses a `x y action` move with 1-indexed coordinates.
fn parse_move(line: &str) -> Option<(Pos, String)> {
    let mut parts = line.split_whitespace();
    let x: usize = parts.next()?.parse().ok()?;
    let y: usize = parts.next()?.parse().ok()?;
    let action = parts.next()?.to_lowercase();
    if parts.next().is_some() || x == 0 || y == 0 {
        return None;
    }
    Some((Pos::new(x - 1, y - 1), action))
}

fn run(args: &Args, input: &mut impl BufRead) -> io::Result<ExitCode> {
    let mines = match args.mines {
        Some(count) => count,
        None => match prompt_mine_count(input, args.width * args.height)? {
            Some(count) => count,
            None => return Ok(ExitCode::SUCCESS),
        },
    };
    let params = GameParams {
        width: args.width,
        height: args.height,
        mines,
    };

    let setup = match args.seed {
        Some(seed) => Game::new(&params, &mut StdRng::seed_from_u64(seed)),
        None => Game::new(&params, &mut rand::rng()),
    };
    let mut game = match setup {
        Ok(game) => game,
        Err(err) => {
            eprintln!("{err}");
            return Ok(ExitCode::FAILURE);
        }
    };

    print_field(&game, params.width, params.height);

    loop {
        println!("Set/delete mine marks (x and y coordinates):");
        io::stdout().flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(ExitCode::SUCCESS);
        };

        let Some((pos, action)) = parse_move(&line) else {
            println!("Bad coordinates, please try again.");
            continue;
        };

        let result = match action.as_str() {
            "mine" | "flag" => game.toggle_flag(pos).map(|()| RevealOutcome::Revealed),
            "free" | "reveal" => game.reveal(pos),
            _ => {
                println!("Unknown action '{action}', use 'mine' or 'free'.");
                continue;
            }
        };

        match result {
            // Out of bounds is recoverable: re-prompt, state untouched.
            Err(GameError::OutOfBounds(_)) => {
                println!("Bad coordinates, please try again.");
                continue;
            }
            Err(err) => {
                eprintln!("{err}");
                return Ok(ExitCode::FAILURE);
            }
            Ok(RevealOutcome::SteppedOnMine) => {
                print_field(&game, params.width, params.height);
                println!("You stepped on a mine and failed!");
                info!("game lost");
                return Ok(ExitCode::SUCCESS);
            }
            Ok(RevealOutcome::Revealed) => {}
        }

        print_field(&game, params.width, params.height);

        if game.is_won() {
            println!("Congratulations! You found all the mines!");
            info!("game won");
            return Ok(ExitCode::SUCCESS);
        }
    }
}

fn main() -> io::Result<ExitCode> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    let stdin = io::stdin();
    run(&args, &mut stdin.lock())
}
