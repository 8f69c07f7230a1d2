//! Command-line driver for the PRNG versus entropy scatter comparison.
//!
//! Generates both point sets, prints a short summary and writes the
//! side-by-side image.  Settings come from defaults, an optional JSON config
//! (`--config` or `LATTICE_SCATTER_CONFIG`) and flags, in that order.

use lattice_scatter::{
    comparison_dimensions, render_comparison, run_comparison, write_coordinates_csv,
    BitFileSource, EntropySource, HadamardSimulator, RunConfig,
};
use std::env;
use std::path::PathBuf;

const GUTTER: usize = 16;

fn fatal(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn print_help() {
    println!("Usage: lattice_scatter [flags]");
    println!("  --config <file.json>     load settings from JSON");
    println!("  --points <N>             points per method (default 100000)");
    println!("  --canvas <N>             canvas size / coordinate bound (default 1000)");
    println!("  --bits <N>               bits per quantized number (default 16)");
    println!("  --seed <N>               seed the simulated entropy device");
    println!("  --bits-file <path>       read recorded 0/1 shots instead of simulating");
    println!("  --overprovision <N>      extra bits requested from the source");
    println!("  --out <file.bmp>         output image path");
    println!("  --csv <dir>              also export both point sets as CSV");
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<String>) -> Result<T, String> {
    let value = value.ok_or_else(|| format!("{flag} expects a value"))?;
    value
        .parse()
        .map_err(|_| format!("invalid {flag} value: {value}"))
}

/// Settings resolved from the command line.
#[derive(Debug)]
struct Invocation {
    cfg: RunConfig,
    bits_file: Option<PathBuf>,
    help: bool,
}

/// Resolves settings as defaults, then config file, then flags.
///
/// `--config` is applied first wherever it appears so later flags always win.
fn parse_args(base: RunConfig, args: Vec<String>) -> Result<Invocation, String> {
    let mut cfg = base;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" {
            let path: String = parse_value("--config", iter.next().cloned())?;
            cfg = RunConfig::load(&path).map_err(|err| err.to_string())?;
        }
    }

    let mut bits_file: Option<PathBuf> = None;
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                iter.next();
            }
            "--points" => cfg.n_points = parse_value("--points", iter.next())?,
            "--canvas" => cfg.canvas_size = parse_value("--canvas", iter.next())?,
            "--bits" => cfg.bits_per_number = parse_value("--bits", iter.next())?,
            "--seed" => cfg.entropy_seed = Some(parse_value("--seed", iter.next())?),
            "--bits-file" => {
                bits_file = Some(parse_value::<String>("--bits-file", iter.next())?.into())
            }
            "--overprovision" => {
                cfg.overprovision_bits = parse_value("--overprovision", iter.next())?
            }
            "--out" => cfg.output_image = parse_value("--out", iter.next())?,
            "--csv" => cfg.csv_dir = Some(parse_value("--csv", iter.next())?),
            "-h" | "--help" => {
                return Ok(Invocation {
                    cfg,
                    bits_file,
                    help: true,
                })
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(Invocation {
        cfg,
        bits_file,
        help: false,
    })
}

fn main() {
    let base = RunConfig::from_env().unwrap_or_else(|err| fatal(&err.to_string()));
    let Invocation {
        cfg,
        bits_file,
        help,
    } = parse_args(base, env::args().skip(1).collect()).unwrap_or_else(|err| fatal(&err));
    if help {
        print_help();
        return;
    }

    if let Err(err) = cfg.validate() {
        fatal(&err.to_string());
    }
    if let Err(err) = comparison_dimensions(cfg.canvas_size, GUTTER) {
        fatal(&err.to_string());
    }

    println!(
        "Generating {} (x,y) coordinates for each method...",
        cfg.n_points
    );
    let mut source: Box<dyn EntropySource> = match (&bits_file, cfg.entropy_seed) {
        (Some(path), _) => Box::new(BitFileSource::new(path)),
        (None, Some(seed)) => Box::new(HadamardSimulator::with_seed(seed)),
        (None, None) => Box::new(HadamardSimulator::from_entropy()),
    };

    let comparison =
        run_comparison(&cfg, source.as_mut()).unwrap_or_else(|err| fatal(&err.to_string()));

    println!("{:>8} | {:>8} | {:>16}", "method", "points", "fingerprint");
    println!("{}", "-".repeat(38));
    for (label, list) in [("lcg", &comparison.prng), ("entropy", &comparison.entropy)] {
        println!(
            "{:>8} | {:>8} | {:>16}",
            label,
            list.len(),
            &list.fingerprint()[..16]
        );
    }

    if let Some(dir) = &cfg.csv_dir {
        for (prefix, list) in [("prng", &comparison.prng), ("entropy", &comparison.entropy)] {
            match write_coordinates_csv(dir, prefix, list) {
                Ok(path) => println!("QSYS|mod=RENDER|evt=CSV|path={}", path.display()),
                Err(err) => fatal(&format!("failed to write {prefix} csv: {err}")),
            }
        }
    }

    let canvas = render_comparison(&comparison.prng, &comparison.entropy, GUTTER)
        .unwrap_or_else(|err| fatal(&err.to_string()));
    if let Err(err) = canvas.save_bmp(&cfg.output_image) {
        fatal(&format!("failed to write {}: {err}", cfg.output_image));
    }
    println!(
        "QSYS|mod=RENDER|evt=IMAGE|path={}|width={}|height={}|inked={}",
        cfg.output_image,
        canvas.width(),
        canvas.height(),
        canvas.inked_pixels()
    );
}
