/// pzh – inspect and exercise Huffman codes built from a corpus.
///
///   pzh file.txt               → print the corpus encoded as '0'/'1' text
///   pzh -m "text" file.txt     → encode "text" with codes built from file.txt
///   pzh -d 0110 file.txt       → decode bits with the tree of file.txt
///   pzh -t file.txt            → print the code table
///   pzh -T file.txt            → print the in-order traversal
///   cat file | pzh -s          → build from stdin, print the tree structure
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::process::{self, ExitCode};

use log::LevelFilter;
use pzhuff::{BuildOptions, HuffmanTree, SymbolOrder};

fn usage() {
    eprintln!("pzh - Huffman code inspection tool");
    eprintln!();
    eprintln!("Usage: pzh [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e, --encode        Print the encoded corpus as bit text (default)");
    eprintln!("  -m, --message TEXT  Encode TEXT instead of the corpus");
    eprintln!("  -d, --decode BITS   Decode a '0'/'1' bit string (repeatable)");
    eprintln!("  -t, --table         Print the code table");
    eprintln!("  -T, --traverse      Print the in-order tree traversal");
    eprintln!("  -s, --structure     Print the tree structure");
    eprintln!("  -b, --byte-order    Break weight ties by byte value, not first occurrence");
    eprintln!("  -q, --quiet         Suppress warnings");
    eprintln!("  -v, --verbose       Verbose output (repeat for trace)");
    eprintln!("  -h, --help          Show this help");
    eprintln!();
    eprintln!("The tree is built from FILE, or from stdin if no FILE is given.");
}

#[derive(Debug)]
struct Opts {
    encode: bool,
    message: Option<String>,
    decode: Vec<String>,
    table: bool,
    traverse: bool,
    structure: bool,
    order: SymbolOrder,
    verbosity: u8,
    quiet: bool,
    file: Option<String>,
}

fn missing_argument(flag: &str) -> ! {
    eprintln!("pzh: missing argument for {flag}");
    process::exit(1);
}

fn parse_args() -> Opts {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut opts = Opts {
        encode: false,
        message: None,
        decode: Vec::new(),
        table: false,
        traverse: false,
        structure: false,
        order: SymbolOrder::FirstOccurrence,
        verbosity: 0,
        quiet: false,
        file: None,
    };

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-e" | "--encode" => opts.encode = true,
            "-t" | "--table" => opts.table = true,
            "-T" | "--traverse" => opts.traverse = true,
            "-s" | "--structure" => opts.structure = true,
            "-b" | "--byte-order" => opts.order = SymbolOrder::ByteValue,
            "-v" | "--verbose" => opts.verbosity += 1,
            "-q" | "--quiet" => opts.quiet = true,
            "-h" | "--help" => {
                usage();
                process::exit(0);
            }
            "-m" | "--message" => {
                i += 1;
                match args.get(i) {
                    Some(text) => opts.message = Some(text.clone()),
                    None => missing_argument("-m"),
                }
            }
            "-d" | "--decode" => {
                i += 1;
                match args.get(i) {
                    Some(bits) => opts.decode.push(bits.clone()),
                    None => missing_argument("-d"),
                }
            }
            // Handle combined short flags like -tT, -vv, etc.
            s if s.starts_with('-') && !s.starts_with("--") && s.len() > 2 => {
                for ch in s[1..].chars() {
                    match ch {
                        'e' => opts.encode = true,
                        't' => opts.table = true,
                        'T' => opts.traverse = true,
                        's' => opts.structure = true,
                        'b' => opts.order = SymbolOrder::ByteValue,
                        'v' => opts.verbosity += 1,
                        'q' => opts.quiet = true,
                        _ => {
                            eprintln!("pzh: unknown flag '-{ch}'");
                            process::exit(1);
                        }
                    }
                }
            }
            s if s.starts_with('-') && s != "-" => {
                eprintln!("pzh: unknown option '{s}'");
                process::exit(1);
            }
            _ => {
                if opts.file.is_some() {
                    eprintln!("pzh: only one corpus FILE may be given");
                    process::exit(1);
                }
                opts.file = Some(arg.clone());
            }
        }
        i += 1;
    }

    // With no explicit action, encode.
    if opts.decode.is_empty()
        && !opts.table
        && !opts.traverse
        && !opts.structure
        && opts.message.is_none()
    {
        opts.encode = true;
    }

    opts
}

/// Map `-q`/`-v` to a log level filter.
fn log_level(opts: &Opts) -> LevelFilter {
    match (opts.quiet, opts.verbosity) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

fn init_logging(opts: &Opts) {
    let _ = env_logger::Builder::new()
        .filter_level(log_level(opts))
        .format_target(false)
        .format_timestamp(None)
        .try_init();
}

fn read_corpus(opts: &Opts) -> io::Result<Vec<u8>> {
    match opts.file.as_deref() {
        Some("-") | None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            Ok(data)
        }
        Some(path) => fs::read(path),
    }
}

fn run(opts: &Opts) -> Result<(), Box<dyn std::error::Error>> {
    let corpus = read_corpus(opts)?;
    let tree = HuffmanTree::from_data_with(&corpus, BuildOptions { order: opts.order })?;
    log::info!(
        "corpus: {} bytes, {} distinct symbols",
        corpus.len(),
        tree.leaf_count()
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if opts.structure {
        write!(out, "{tree}")?;
    }

    let freq = tree.frequency_table()?;

    if opts.table {
        for (symbol, code) in tree.code_table().iter() {
            writeln!(
                out,
                "{:?}\t0x{symbol:02x}\t{}\t{code}",
                symbol as char,
                freq.get(symbol)
            )?;
        }
    }

    if opts.traverse {
        for visit in tree.traverse() {
            let indent = "  ".repeat(visit.depth);
            match visit.symbol {
                Some(symbol) => writeln!(out, "{indent}{:?} {}", symbol as char, visit.weight)?,
                None => writeln!(out, "{indent}* {}", visit.weight)?,
            }
        }
    }

    if opts.encode || opts.message.is_some() {
        let data = opts.message.as_deref().map_or(&corpus[..], str::as_bytes);
        let bits = tree.encode(data)?;
        writeln!(out, "{bits}")?;
        if !data.is_empty() {
            log::debug!(
                "{} bytes -> {} bits ({:.3} bits/byte, entropy {:.3})",
                data.len(),
                bits.len(),
                bits.len() as f64 / data.len() as f64,
                freq.entropy()
            );
        }
    }

    for text in &opts.decode {
        let decoded = tree.decode_text(text)?;
        out.write_all(&decoded)?;
        writeln!(out)?;
    }

    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let opts = parse_args();
    init_logging(&opts);

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pzh: {e}");
            ExitCode::FAILURE
        }
    }
}
