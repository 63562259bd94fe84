use clap::Parser;

use robdd_rs::engine::Engine;
use robdd_rs::reference::Ref;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of queens.
    #[arg(value_name = "INT", default_value = "8")]
    n: usize,

    /// Storage size (in bits, so the actual size is `2^size` nodes).
    #[clap(long, value_name = "INT", default_value = "20")]
    size: usize,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();

    let args = Cli::parse();
    println!("args = {:?}", args);

    // Note: 20 bits (default) are enough for n=8; n=10 needs around 24.
    let engine = Engine::new(args.size);
    println!("engine = {:?}", engine);

    // Encode the N-queens problem:
    // - N queens on an NxN board
    // - at least one queen per row
    // - no two queens attack each other
    let n = args.n;
    println!("Encoding n-queens problem with n = {}", n);
    engine.declare_vars((n * n) as u32);
    let mut queens = vec![];
    for i in 0..n {
        let mut row = vec![];
        for j in 0..n {
            row.push(engine.mk_var((i * n + j) as u32));
        }
        queens.push(row);
    }

    let mut constraints: Vec<Ref> = vec![];

    // At least one queen per row
    for i in 0..n {
        let row = engine.apply_or_many(queens[i].iter().copied());
        constraints.push(row);
    }

    // No two queens on the same row, column, or diagonal
    for i in 0..n as i32 {
        for j in 0..n as i32 {
            for k in 0..n as i32 {
                for l in 0..n as i32 {
                    if (i, j) >= (k, l) {
                        continue;
                    }
                    let attacking = i == k || j == l || i + j == k + l || i - j == k - l;
                    if attacking {
                        let a = queens[i as usize][j as usize];
                        let b = queens[k as usize][l as usize];
                        let not_both = engine.apply_not(engine.apply_and(a, b));
                        constraints.push(not_both);
                    }
                }
            }
        }
    }

    println!(
        "Total {} constraints of total size {}",
        constraints.len(),
        engine.descendants(constraints.iter().copied()).len()
    );

    println!("Merging constraints...");
    let res = engine.apply_and_many(constraints.iter().copied());
    println!("engine = {:?}", engine);
    println!("res of size {} = {}", engine.size(res), res);

    let solutions = engine.sat_count(res, (n * n) as u32);
    println!("{} solutions for n = {}", solutions, n);

    let (hits, misses) = engine.cache_stats();
    println!("cache hits: {}", hits);
    println!("cache misses: {}", misses);

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
