use clap::Parser;
use extra_random::{
    table_with_source, Bias, BiasConfig, BiasedRandom, RandomError, RegularRandom, Source,
    UniformSource, WeightedTable,
};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

/// Reads weighted table definitions such as `3 sword, 1 "golden shield"` and
/// draws entries from them. An empty line ends a definition.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Seed for reproducible draws.
    #[arg(long)]
    seed: Option<u64>,
    /// Samples taken per roll. More than one biases every draw.
    #[arg(long, default_value_t = 1)]
    rolls: usize,
    /// Which extreme of the samples is kept.
    #[arg(long, default_value_t = Bias::Lower)]
    bias: Bias,
    /// Entries drawn from each table.
    #[arg(long, default_value_t = 1)]
    draws: usize,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn make_source(args: &Args) -> Result<Source, RandomError> {
    let regular = match args.seed {
        Some(seed) => RegularRandom::with_seed(seed),
        None => RegularRandom::new(),
    };
    if args.rolls == 1 {
        return Ok(regular.into());
    }
    let config = BiasConfig::new(args.rolls, args.bias)?;
    Ok(BiasedRandom::new(config, regular).into())
}

fn print_table<S: UniformSource, W: Write>(
    table: &mut WeightedTable<String, S>,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "{:>8}  {:<24}  {:>7}", "Weight", "Entry", "Chance")?;
    for entry in table.percentages() {
        writeln!(
            out,
            "{:>8}  {:<24}  {:>6.2}%",
            entry.weight,
            entry.payload,
            entry.percentage()
        )?;
    }
    Ok(())
}

fn run_block<S: UniformSource, W: Write>(
    definition: &str,
    source: S,
    draws: usize,
    out: &mut W,
) -> io::Result<()> {
    match table_with_source(definition, source) {
        Ok(mut table) => {
            print_table(&mut table, out)?;
            for _ in 0..draws {
                if let Some(payload) = table.next_payload() {
                    writeln!(out, "=> {}", payload)?;
                }
            }
        }
        Err(why) => eprintln!("Error: {}", why),
    }
    Ok(())
}

/// Runs every definition in `input`. A definition still buffered at end of
/// input is run as if an empty line followed it.
fn run<R: BufRead, S: UniformSource, W: Write>(
    input: R,
    mut source: S,
    draws: usize,
    out: &mut W,
) -> io::Result<()> {
    let mut lines = input.lines();
    let mut buf = String::new();
    write!(out, "> ")?;
    out.flush()?;
    while let Some(Ok(line)) = lines.next() {
        if line.is_empty() {
            run_block(&buf, &mut source, draws, out)?;
            write!(out, "> ")?;
            out.flush()?;
            buf.clear();
        } else {
            buf.push_str(&line);
            buf.push('\n');
            write!(out, "... ")?;
            out.flush()?;
        }
    }
    if !buf.trim().is_empty() {
        writeln!(out)?;
        run_block(&buf, &mut source, draws, out)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging();
    let source = make_source(&args)?;
    tracing::debug!(?args, "starting repl");

    let stdin = io::stdin();
    let stdout = io::stdout();
    run(stdin.lock(), source, args.draws, &mut stdout.lock())?;
    Ok(())
}
