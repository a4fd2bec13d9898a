//! Command-line front end: converts XML files to document maps and back.
//!
//! By default each input is parsed and its document map is printed as an
//! indented tree. `--xml` re-serializes the map instead, which makes the
//! tool handy for checking how a document survives a round trip.

use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use xmldict::{
    parse_bytes_with_options, to_xml_with_options, AttributesMode, DocumentMap, NodeNameMode,
    ParseOptions, SerializeOptions, Value,
};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// xmldict -- convert XML documents to document maps and back.
#[derive(Parser, Debug)]
#[command(name = "xmldict", version, about, long_about = None)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// XML files to process (use `-` for stdin).
    #[arg(required = true)]
    files: Vec<String>,

    // -- Parsing options ---------------------------------------------------
    /// Keep text-only elements as maps instead of collapsing them to text.
    #[arg(long)]
    no_collapse: bool,

    /// Keep elements that have no attributes, children, comments or text.
    #[arg(long)]
    keep_empty: bool,

    /// Keep leading and trailing whitespace in text.
    #[arg(long)]
    no_trim: bool,

    /// Store every child element in a list.
    #[arg(long)]
    always_arrays: bool,

    /// Keep comments.
    #[arg(long)]
    comments: bool,

    /// Wrap the root element under a map keyed by its tag name.
    #[arg(long)]
    wrap_root: bool,

    /// Where attributes are placed.
    #[arg(long, value_enum, default_value_t = AttributesArg::Prefixed)]
    attributes: AttributesArg,

    /// Which elements record their tag name.
    #[arg(long, value_enum, default_value_t = NodeNamesArg::RootOnly)]
    node_names: NodeNamesArg,

    /// Maximum element nesting depth.
    #[arg(long, value_name = "N", default_value_t = xmldict::sax::DEFAULT_MAX_DEPTH)]
    max_depth: u32,

    // -- Output options ----------------------------------------------------
    /// Print the document map as an indented tree (the default).
    #[arg(long, conflicts_with = "xml")]
    debug: bool,

    /// Print the document map re-serialized as XML.
    #[arg(long)]
    xml: bool,

    /// Tag for a top-level map without a recorded name (with `--xml`).
    #[arg(long, value_name = "NAME", default_value = "root")]
    root_name: String,

    /// Always emit the enclosing root element (with `--xml`).
    #[arg(long)]
    force_root: bool,

    /// Save output to the given file instead of stdout.
    #[arg(long, short, value_name = "FILE")]
    output: Option<String>,

    /// Print timing information for parsing and serialization.
    #[arg(long)]
    timing: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AttributesArg {
    Prefixed,
    Dictionary,
    Unprefixed,
    Discard,
}

impl From<AttributesArg> for AttributesMode {
    fn from(arg: AttributesArg) -> Self {
        match arg {
            AttributesArg::Prefixed => Self::Prefixed,
            AttributesArg::Dictionary => Self::Dictionary,
            AttributesArg::Unprefixed => Self::Unprefixed,
            AttributesArg::Discard => Self::Discard,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NodeNamesArg {
    RootOnly,
    Always,
    Never,
}

impl From<NodeNamesArg> for NodeNameMode {
    fn from(arg: NodeNamesArg) -> Self {
        match arg {
            NodeNamesArg::RootOnly => Self::RootOnly,
            NodeNamesArg::Always => Self::Always,
            NodeNamesArg::Never => Self::Never,
        }
    }
}

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

const EXIT_SUCCESS: u8 = 0;
const EXIT_FAILURE: u8 = 1;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    let options = parse_options(&cli);
    let mut worst_exit: u8 = EXIT_SUCCESS;

    for file in &cli.files {
        let exit = process_file(&cli, &options, file);
        if exit > worst_exit {
            worst_exit = exit;
        }
    }

    ExitCode::from(worst_exit)
}

fn parse_options(cli: &Cli) -> ParseOptions {
    ParseOptions::default()
        .collapse_text_nodes(!cli.no_collapse)
        .strip_empty_nodes(!cli.keep_empty)
        .trim_whitespace(!cli.no_trim)
        .always_use_arrays(cli.always_arrays)
        .preserve_comments(cli.comments)
        .wrap_root_node(cli.wrap_root)
        .attributes_mode(cli.attributes.into())
        .node_name_mode(cli.node_names.into())
        .max_depth(cli.max_depth)
}

/// Processes a single input file and returns an exit code.
fn process_file(cli: &Cli, options: &ParseOptions, filename: &str) -> u8 {
    // -- Read input --------------------------------------------------------
    let start_read = Instant::now();

    let input = match read_input(filename) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("{filename}: failed to read: {e}");
            return EXIT_FAILURE;
        }
    };

    if cli.timing {
        let elapsed = start_read.elapsed();
        eprintln!("Reading file {filename} took {elapsed:?}");
    }

    // -- Parse -------------------------------------------------------------
    let start_parse = Instant::now();

    let map = match parse_bytes_with_options(&input, options) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{filename}: {e}");
            return EXIT_FAILURE;
        }
    };

    if cli.timing {
        let elapsed = start_parse.elapsed();
        eprintln!("Parsing took {elapsed:?}");
    }

    // -- Output ------------------------------------------------------------
    if cli.xml && !cli.debug {
        let start_serial = Instant::now();

        let serialize_options = SerializeOptions::default()
            .keys(options.keys.clone())
            .root_name(&cli.root_name)
            .force_root(cli.force_root);
        let mut xml = to_xml_with_options(&map, &serialize_options);
        xml.push('\n');
        write_output(cli, &xml);

        if cli.timing {
            let elapsed = start_serial.elapsed();
            eprintln!("Serializing took {elapsed:?}");
        }
    } else {
        write_output(cli, &format_debug_tree(&map));
    }

    EXIT_SUCCESS
}

// ---------------------------------------------------------------------------
// Input reading
// ---------------------------------------------------------------------------

/// Reads input from a file or stdin (when filename is `-`).
fn read_input(filename: &str) -> io::Result<Vec<u8>> {
    if filename == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(filename)
    }
}

// ---------------------------------------------------------------------------
// Debug tree
// ---------------------------------------------------------------------------

/// Produces an indented listing of a document map.
///
/// Maps print as `MAP`, lists as `LIST (n)` followed by their indexed
/// elements, and scalars inline after their key.
fn format_debug_tree(map: &DocumentMap) -> String {
    let mut output = String::new();
    output.push_str("MAP\n");
    format_debug_map(map, 1, &mut output);
    output
}

fn format_debug_map(map: &DocumentMap, depth: usize, out: &mut String) {
    for (key, value) in map.iter() {
        out.push_str(&"  ".repeat(depth));
        out.push_str(key);
        format_debug_value(value, depth, out);
    }
}

fn format_debug_value(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Text(text) => {
            let _ = writeln!(out, " = {text:?}");
        }
        Value::Integer(n) => {
            let _ = writeln!(out, " = {n}");
        }
        Value::Map(map) => {
            out.push_str(": MAP\n");
            format_debug_map(map, depth + 1, out);
        }
        Value::List(items) => {
            let _ = writeln!(out, ": LIST ({})", items.len());
            for (i, item) in items.iter().enumerate() {
                out.push_str(&"  ".repeat(depth + 1));
                let _ = write!(out, "[{i}]");
                format_debug_value(item, depth + 1, out);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn write_output(cli: &Cli, content: &str) {
    if let Some(ref output_file) = cli.output {
        if let Err(e) = fs::write(output_file, content) {
            eprintln!("{output_file}: failed to write: {e}");
        }
    } else {
        print!("{content}");
        // Flush stdout to ensure output is complete, especially when piped.
        let _ = io::stdout().flush();
    }
}
