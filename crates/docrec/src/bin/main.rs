//! docrec command-line interface

use anyhow::Result;
use clap::{Parser, Subcommand};
use docrec::TypeTag;
use docrec::cli::config::CliConfig;
use docrec::cli::output::{self, OutputFormat};
use docrec::cli::{coerce, decode, encode, infer, logger, resolve, sort};
use std::path::PathBuf;

/// Record literal and path tools
#[derive(Parser)]
#[command(name = "docrec")]
#[command(author, version, about = "Schema-less record tools", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json, pretty)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    /// Configuration file with date formats and schema (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the type of an untyped literal
    Infer {
        /// Literal text, or @file
        text: String,

        /// Fail when the body does not parse as the inferred type
        #[arg(short, long)]
        strict: bool,
    },

    /// Decode record text
    Decode {
        /// Record text, or @file
        text: String,

        /// Declared type of the value
        #[arg(short = 't', long = "type")]
        tag: Option<TypeTag>,

        /// Decode a whole record body
        #[arg(short, long, conflicts_with = "tag")]
        record: bool,
    },

    /// Re-encode a literal under a declared type
    Encode {
        /// Literal text, or @file
        text: String,

        /// Declared type
        #[arg(short = 't', long = "type")]
        tag: TypeTag,
    },

    /// Coerce a literal to a declared type
    Coerce {
        /// Literal text, or @file
        text: String,

        /// Target type
        #[arg(short = 't', long = "type")]
        tag: TypeTag,
    },

    /// Resolve field paths against a document
    Resolve {
        /// Paths to resolve
        #[arg(required = true)]
        paths: Vec<String>,

        /// Record text of the starting document, or @file
        #[arg(short, long)]
        document: String,

        /// Record store file used to follow links (one `#c:p record` per line)
        #[arg(short, long)]
        records: Option<PathBuf>,
    },

    /// Order the records of a store file by field paths
    Sort {
        /// Record store file (one `#c:p record` per line)
        records: PathBuf,

        /// Sort criteria, `path` or `path DESC`
        #[arg(short = 'b', long = "by", required = true)]
        order_by: Vec<String>,
    },
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);
    logger::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(output::exit_code(&e));
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let format = OutputFormat::parse(cli.format.as_deref());
    let output_file = cli.output;

    match cli.command {
        Commands::Infer { text, strict } => infer::infer(infer::InferConfig {
            text,
            strict,
            format,
            output_file,
        }),

        Commands::Decode { text, tag, record } => decode::decode(decode::DecodeConfig {
            text,
            tag,
            record,
            config,
            format,
            output_file,
        }),

        Commands::Encode { text, tag } => encode::encode(encode::EncodeConfig {
            text,
            tag,
            config,
            format,
            output_file,
        }),

        Commands::Coerce { text, tag } => coerce::coerce(coerce::CoerceConfig {
            text,
            tag,
            config,
            format,
            output_file,
        }),

        Commands::Resolve {
            paths,
            document,
            records,
        } => resolve::resolve(resolve::ResolveConfig {
            document,
            paths,
            records,
            config,
            format,
            output_file,
        }),

        Commands::Sort { records, order_by } => sort::sort(sort::SortConfig {
            records,
            order_by,
            config,
            format,
            output_file,
        }),
    }
}
