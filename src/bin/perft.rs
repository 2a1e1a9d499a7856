use alfiere::board::{Board, START_FEN};
use alfiere::perft::{divide, perft};
use clap::Parser;
use shakmaty::fen::Fen;
use shakmaty::{Chess, Position};

#[derive(Parser, Debug)]
#[command(author, version, about = "Count legal move paths from a position", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u32,

    /// Print the node count below each root move
    #[arg(long)]
    divide: bool,

    /// Cross-check the total against shakmaty
    #[arg(long)]
    verify: bool,
}

fn main() {
    let args = Args::parse();
    alfiere::init();

    let mut board = match Board::from_fen(&args.fen) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("invalid FEN '{}': {}", args.fen, e);
            std::process::exit(2);
        }
    };

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    let start = std::time::Instant::now();
    let nodes = if args.divide {
        let parts = divide(&mut board, args.depth);
        for (mv, n) in &parts {
            println!("{}: {}", mv, n);
        }
        parts.iter().map(|(_, n)| n).sum()
    } else {
        perft(&mut board, args.depth)
    };
    let duration = start.elapsed();

    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );

    if args.verify {
        let pos: Chess = match args.fen.parse::<Fen>().map(|f| f.into_position(shakmaty::CastlingMode::Standard)) {
            Ok(Ok(p)) => p,
            _ => {
                eprintln!("shakmaty rejected the FEN, cannot verify");
                std::process::exit(2);
            }
        };
        let expected = perft_shakmaty(&pos, args.depth);
        if expected == nodes {
            println!("verified against shakmaty: {}", expected);
        } else {
            println!("MISMATCH: shakmaty counts {}", expected);
            std::process::exit(1);
        }
    }
}

fn perft_shakmaty(pos: &Chess, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}
