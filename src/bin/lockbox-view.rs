//! CLI tool to decode a Lockbox remittance file and print its structure.
//!
//! Usage:
//!   lockbox-view <input.lbx>
//!   lockbox-view <input.lbx> --format stats
//!   lockbox-view <input.lbx> --format records --code 6 --search acme
//!   lockbox-view <input.lbx> --format json -o out/input.json
//!
//! If no output file is specified, writes to stdout.

use clap::{Parser, ValueEnum};
use lockbox_rs::format::{format_amount, format_date, format_time};
use lockbox_rs::query::default_columns;
use lockbox_rs::{
    DecodedFile, GroupKind, GroupNode, LockboxError, RecordFilter, build_tree_traced, decode_bytes,
};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{EnvFilter, fmt};

/// Decode a fixed-width Lockbox file into its record tree and statistics.
#[derive(Parser)]
#[command(name = "lockbox-view", version)]
struct Cli {
    /// Lockbox data file
    input: PathBuf,

    /// What to print
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree)]
    format: OutputFormat,

    /// Only list records with this record code (records format)
    #[arg(long)]
    code: Option<char>,

    /// Only list records containing this text, case-insensitive (records format)
    #[arg(long)]
    search: Option<String>,

    /// Print the grouping trace to stderr
    #[arg(long)]
    trace: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log decode diagnostics at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Indented group tree
    Tree,
    /// File info, record counts, accounts and transactions
    Stats,
    /// Flat record list
    Records,
    /// Full JSON export
    Json,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> lockbox_rs::Result<()> {
    let file = load(&cli.input)?;

    if cli.trace {
        let (_, trace) = build_tree_traced(&file.records);
        eprint!("{trace}");
    }

    let output = match cli.format {
        OutputFormat::Tree => render_tree(&file),
        OutputFormat::Stats => render_stats(&file),
        OutputFormat::Records => {
            let mut filter = RecordFilter::new();
            if let Some(term) = &cli.search {
                filter = filter.search(term);
            }
            if let Some(code) = cli.code {
                filter = filter.code(code);
            }
            render_records(&file, &filter)
        }
        OutputFormat::Json => file.to_json()?,
    };

    match &cli.output {
        Some(path) => write_output(path, &output)?,
        None => {
            let mut stdout = io::stdout();
            stdout
                .write_all(output.as_bytes())
                .and_then(|_| {
                    if output.is_empty() || output.ends_with('\n') {
                        Ok(())
                    } else {
                        writeln!(stdout)
                    }
                })
                .map_err(|e| LockboxError::io("<stdout>", e))?;
        }
    }
    Ok(())
}

fn load(path: &Path) -> lockbox_rs::Result<DecodedFile> {
    let bytes = fs::read(path).map_err(|e| LockboxError::io(path, e))?;
    decode_bytes(&bytes)
}

fn write_output(path: &Path, output: &str) -> lockbox_rs::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| LockboxError::io(parent, e))?;
    }
    fs::write(path, output).map_err(|e| LockboxError::io(path, e))
}

fn render_tree(file: &DecodedFile) -> String {
    let tree = file.group_tree();
    let mut lines = Vec::new();
    for root in tree.roots() {
        render_group(root, 0, &mut lines);
    }
    lines.join("\n")
}

fn render_group(node: &GroupNode<'_>, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let line = match (node.kind(), node.header()) {
        (GroupKind::Detail, Some(payment)) => format!(
            "{indent}Payment item {} {} check {} ({} invoices)",
            payment.raw_value("Item Number"),
            format_amount(payment.raw_value("Remittance Amount")),
            payment.raw_value("Check Number"),
            node.overflow().count()
        ),
        (GroupKind::Orphan, Some(record)) => format!(
            "{indent}Orphan {} [{}]",
            record.type_name(),
            record.index
        ),
        _ => format!(
            "{indent}{} [{}] ({} records)",
            node.title(),
            node.id(),
            node.record_count()
        ),
    };
    lines.push(line);

    for child in node.children() {
        render_group(child, depth + 1, lines);
    }
    if let Some(trailer) = node.trailer() {
        lines.push(format!(
            "{indent}  {} [{}]",
            trailer.type_name(),
            trailer.index
        ));
    }
}

fn render_stats(file: &DecodedFile) -> String {
    let stats = file.statistics();
    let mut lines = Vec::new();

    match &stats.file_info {
        Some(info) => {
            lines.push(format!("Sender:        {}", info.sender));
            lines.push(format!("Receiver:      {}", info.receiver));
            lines.push(format!("Creation date: {}", format_date(&info.creation_date)));
            lines.push(format!("Creation time: {}", format_time(&info.creation_time)));
        }
        None => lines.push("No transmission header".to_string()),
    }

    lines.push(format!("Total records: {}", stats.total_records));
    lines.push(format!("Record types:  {}", stats.record_type_count()));
    for (code, count) in &stats.record_counts {
        let name = lockbox_rs::lookup(*code).map(|t| t.name).unwrap_or("?");
        lines.push(format!("  {code} - {name} ({count})"));
    }

    lines.push(format!("Accounts:      {}", stats.accounts.len()));
    for account in &stats.accounts {
        lines.push(format!(
            "  {} {} [{}]",
            account.account_number, account.currency_code, account.index
        ));
    }

    lines.push(format!("Transactions:  {}", stats.transactions.len()));
    for tx in &stats.transactions {
        lines.push(format!(
            "  {} {} RTN {} check {} [{}]",
            tx.type_code,
            format_amount(&tx.amount),
            tx.bank_ref,
            tx.customer_ref,
            tx.index
        ));
    }

    if !file.diagnostics.is_empty() {
        lines.push(format!("Skipped lines: {}", file.diagnostics.len()));
        for diagnostic in &file.diagnostics {
            lines.push(format!("  {diagnostic}"));
        }
    }

    lines.join("\n")
}

fn render_records(file: &DecodedFile, filter: &RecordFilter) -> String {
    file.filter(filter)
        .into_iter()
        .map(|record| {
            let detail = match default_columns(record.code) {
                Some(columns) => columns
                    .iter()
                    .zip(record.select_columns(columns))
                    .map(|(name, value)| format!("{name}={}", value.unwrap_or("")))
                    .collect::<Vec<_>>()
                    .join("  "),
                None => record.raw.trim_end().to_string(),
            };
            format!(
                "{:>6}  {}  {:<20}  {}",
                record.index,
                record.code,
                record.type_name(),
                detail
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
