//! scalasig CLI: inspect pickled symbol tables.

use clap::{Args, Parser, Subcommand};
use scalasig::{DecodeOptions, DecodedTable, Descriptor, EndSkip, Resolution};
use serde_json::{json, Map, Value};
use std::io::{IsTerminal, Read, Write};
use std::process;

#[derive(Parser)]
#[command(name = "scalasig", about = "Decode pickled symbol tables (Scala signatures)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode every entry and print the result
    Dump(DumpArgs),
    /// Print the entry index table (offset and tag per entry)
    Index(IndexArgs),
}

/// Stack fuer den Decode-Thread; erlaubt deutlich mehr als die Default-Tiefe.
const DECODE_STACK_BYTES: usize = 256 * 1024 * 1024;

#[derive(Args)]
struct InputArgs {
    /// Input file ("-" for stdin)
    #[arg(default_value = "-")]
    input: String,
}

#[derive(Args)]
struct LimitArgs {
    /// Maximum bytes per Nat (unbounded if omitted)
    #[arg(long)]
    max_nat_bytes: Option<usize>,

    /// Bounded settings for untrusted input (overridden by explicit limits)
    #[arg(long)]
    strict: bool,
}

impl LimitArgs {
    fn to_options(&self) -> DecodeOptions {
        let mut opts = if self.strict { DecodeOptions::strict() } else { DecodeOptions::default() };
        if let Some(max) = self.max_nat_bytes {
            opts = opts.with_max_nat_bytes(max);
        }
        opts
    }
}

#[derive(Args)]
struct IndexArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    limits: LimitArgs,
}

#[derive(Args)]
struct DumpArgs {
    #[command(flatten)]
    input: InputArgs,

    #[command(flatten)]
    limits: LimitArgs,

    /// Output file ("-" for stdout)
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Emit a JSON document instead of text lines
    #[arg(long)]
    json: bool,

    /// Stop exactly at each entry's end instead of one byte past it
    #[arg(long)]
    exact_end: bool,

    /// Maximum nesting of reference resolution
    #[arg(long)]
    max_depth: Option<usize>,
}

impl DumpArgs {
    fn to_options(&self) -> DecodeOptions {
        let mut opts = self.limits.to_options();
        if self.exact_end {
            opts = opts.with_end_skip(EndSkip::Exact);
        }
        if let Some(depth) = self.max_depth {
            opts = opts.with_max_reference_depth(depth);
        }
        opts
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Fehler: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Dump(args) => run_dump(args),
        Command::Index(args) => run_index(args),
    }
}

/// Besitzer der Eingabedaten: Mmap oder Vec<u8>.
enum PickleInput {
    Buf(Vec<u8>),
    #[cfg(feature = "mmap")]
    Mmap(memmap2::Mmap),
}

impl std::ops::Deref for PickleInput {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        match self {
            PickleInput::Buf(v) => v,
            #[cfg(feature = "mmap")]
            PickleInput::Mmap(m) => m,
        }
    }
}

fn load_input(path: &str) -> Result<PickleInput, String> {
    if path == "-" {
        if std::io::stdin().is_terminal() {
            eprintln!("Lese von stdin (Ctrl+D zum Beenden)...");
        }
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .map_err(|e| format!("Lesefehler (stdin): {e}"))?;
        return Ok(PickleInput::Buf(buf));
    }
    #[cfg(feature = "mmap")]
    {
        let file = std::fs::File::open(path).map_err(|e| format!("Lesefehler '{path}': {e}"))?;
        let mmap = unsafe { memmap2::Mmap::map(&file) }
            .map_err(|e| format!("Mmap-Fehler '{path}': {e}"))?;
        Ok(PickleInput::Mmap(mmap))
    }
    #[cfg(not(feature = "mmap"))]
    {
        let buf = std::fs::read(path).map_err(|e| format!("Lesefehler '{path}': {e}"))?;
        Ok(PickleInput::Buf(buf))
    }
}

fn create_writer(path: &str) -> Result<std::io::BufWriter<Box<dyn Write>>, String> {
    let inner: Box<dyn Write> = if path == "-" {
        Box::new(std::io::stdout().lock())
    } else {
        Box::new(
            std::fs::File::create(path).map_err(|e| format!("Schreibfehler '{path}': {e}"))?,
        )
    };
    Ok(std::io::BufWriter::new(inner))
}

fn run_dump(args: DumpArgs) -> Result<(), String> {
    let opts = args.to_options();
    let input = load_input(&args.input.input)?;
    let table = decode_on_large_stack(&input, &opts)?;

    let mut out = create_writer(&args.output)?;
    if args.json {
        let doc = table_to_json(&table);
        serde_json::to_writer_pretty(&mut out, &doc)
            .map_err(|e| format!("Serialisierungs-Fehler: {e}"))?;
        writeln!(out).map_err(|e| format!("Schreibfehler: {e}"))?;
    } else {
        write_text(&mut out, &table).map_err(|e| format!("Schreibfehler: {e}"))?;
    }
    out.flush().map_err(|e| format!("Schreibfehler: {e}"))
}

/// Decodiert auf einem eigenen Thread mit grossem Stack (Aufloesung ist rekursiv).
fn decode_on_large_stack(data: &[u8], opts: &DecodeOptions) -> Result<DecodedTable, String> {
    std::thread::scope(|s| {
        let handle = std::thread::Builder::new()
            .name("scalasig-decode".into())
            .stack_size(DECODE_STACK_BYTES)
            .spawn_scoped(s, || scalasig::decode_with_options(data, opts))
            .map_err(|e| format!("Thread-Fehler: {e}"))?;
        handle
            .join()
            .map_err(|_| "Decode-Thread abgebrochen".to_string())?
            .map_err(|e| format!("Decode-Fehler: {e}"))
    })
}

fn run_index(args: IndexArgs) -> Result<(), String> {
    let max_nat_bytes = args.limits.to_options().max_nat_bytes();
    let input = load_input(&args.input.input)?;
    let mut cursor = scalasig::SliceCursor::new(&input);
    let header = scalasig::header::decode_bounded(&mut cursor, max_nat_bytes)
        .map_err(|e| format!("Header-Fehler: {e}"))?;
    let index = scalasig::IndexTable::build_bounded(&mut cursor, max_nat_bytes)
        .map_err(|e| format!("Index-Fehler: {e}"))?;

    let mut out = create_writer("-")?;
    let result = (|| -> std::io::Result<()> {
        writeln!(out, "Version {header}")?;
        writeln!(out, "Table size: {}", index.len())?;
        for (i, offset) in index.offsets().iter().enumerate() {
            match index.tag(i) {
                Some(tag) => writeln!(out, "{i}: @{offset} {tag}")?,
                None => writeln!(out, "{i}: @{offset}")?,
            }
        }
        out.flush()
    })();
    result.map_err(|e| format!("Schreibfehler: {e}"))
}

fn write_text(out: &mut impl Write, table: &DecodedTable) -> std::io::Result<()> {
    writeln!(out, "Version {}", table.header())?;
    writeln!(out, "Table size: {}", table.len())?;
    for (i, resolution) in table.iter() {
        writeln!(out, "{i}: {resolution}")?;
    }
    Ok(())
}

fn table_to_json(table: &DecodedTable) -> Value {
    let entries: Vec<Value> = table.iter().map(|(i, r)| resolution_to_json(i, r)).collect();
    let mut unsupported = Map::new();
    for (tag, count) in table.unsupported_tags() {
        unsupported.insert(tag.byte().to_string(), json!(count));
    }
    json!({
        "version": { "major": table.header().major(), "minor": table.header().minor() },
        "size": table.len(),
        "decoded": table.decoded_count(),
        "unsupported": Value::Object(unsupported),
        "entries": entries,
    })
}

fn resolution_to_json(i: usize, resolution: &Resolution) -> Value {
    match resolution {
        Resolution::Decoded(Descriptor::Name { tag, name }) => json!({
            "index": i,
            "tag": tag.byte(),
            "kind": "name",
            "name": name,
        }),
        Resolution::Decoded(Descriptor::Symbol(sym)) => json!({
            "index": i,
            "tag": sym.tag.byte(),
            "kind": "symbol",
            "flags": sym.flags,
            "name_ref": sym.name,
            "owner_ref": sym.owner,
            "private_within_ref": sym.private_within,
            "info_ref": sym.info,
        }),
        Resolution::Unresolved { tag } => json!({
            "index": i,
            "tag": tag.byte(),
            "kind": "unresolved",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scalasig::writer::PickleWriter;
    use scalasig::Tag;

    fn parse_cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("CLI parse failed")
    }

    #[test]
    fn dump_flags_map_to_options() {
        let cli = parse_cli(&[
            "scalasig", "dump", "in.sig", "--exact-end", "--max-depth", "12", "--max-nat-bytes", "3",
        ]);
        let Command::Dump(args) = cli.command else {
            panic!("expected dump command");
        };
        assert_eq!(args.input.input, "in.sig");
        let opts = args.to_options();
        assert_eq!(opts.end_skip(), EndSkip::Exact);
        assert_eq!(opts.max_reference_depth(), 12);
        assert_eq!(opts.max_nat_bytes(), Some(3));
    }

    #[test]
    fn strict_flag_uses_bounded_defaults() {
        let cli = parse_cli(&["scalasig", "dump", "--strict"]);
        let Command::Dump(args) = cli.command else {
            panic!("expected dump command");
        };
        assert_eq!(args.to_options(), DecodeOptions::strict());
    }

    #[test]
    fn input_defaults_to_stdin() {
        let cli = parse_cli(&["scalasig", "index"]);
        let Command::Index(args) = cli.command else {
            panic!("expected index command");
        };
        assert_eq!(args.input.input, "-");
        assert_eq!(args.limits.to_options().max_nat_bytes(), None);
    }

    #[test]
    fn index_accepts_nat_limit() {
        let cli = parse_cli(&["scalasig", "index", "in.sig", "--max-nat-bytes", "4"]);
        let Command::Index(args) = cli.command else {
            panic!("expected index command");
        };
        assert_eq!(args.limits.to_options().max_nat_bytes(), Some(4));
    }

    #[test]
    fn large_stack_decode_passes_errors_through() {
        let err = decode_on_large_stack(&[5], &DecodeOptions::default()).unwrap_err();
        assert!(err.contains("truncated"), "{err}");
    }

    #[test]
    fn json_lists_every_entry() {
        let mut w = PickleWriter::new(5, 2);
        let name = w.name(Tag::TERM_NAME, "Foo");
        let none = w.raw(Tag::NONE_SYM, &[]);
        w.symbol(Tag::TYPE_SYM, name, none, 3, None, none);
        let table = scalasig::decode(&w.finish()).unwrap();

        let doc = table_to_json(&table);
        assert_eq!(doc["version"]["minor"], 2);
        assert_eq!(doc["size"], 3);
        assert_eq!(doc["decoded"], 2);
        assert_eq!(doc["unsupported"]["3"], 1);
        assert_eq!(doc["entries"][0]["name"], "Foo");
        assert_eq!(doc["entries"][2]["flags"], 3);
        assert!(doc["entries"][2]["private_within_ref"].is_null());
    }

    #[test]
    fn text_output_has_one_line_per_entry() {
        let mut w = PickleWriter::new(5, 0);
        w.name(Tag::TYPE_NAME, "T");
        w.raw(Tag::NO_TPE, &[]);
        let table = scalasig::decode(&w.finish()).unwrap();

        let mut buf = Vec::new();
        write_text(&mut buf, &table).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Version 5.0\nTable size: 2\n0: tag:2 (T)\n1: unresolved tag 11(NOtpe)\n"
        );
    }
}
