//! Command-line front end for the `jsonsieve` library.
//!
//! Processes JSON from FILEs or standard input. The action is one of:
//! - check (default): verify the input is valid JSON
//! - pretty-print: re-emit the input indented
//! - filter: output the values selected by a filter string as elements of
//!   a JSON array

use std::cell::RefCell;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use bstr::BStr;
use clap::Parser;
use jsonsieve::{
    EchoConsumer, JsonParser, NullConsumer, ParseError, ParserOptions, PathDispatcher, ValueKind,
    ValuePath,
};

const EXIT_PARSE_ERROR: u8 = 1;
const EXIT_FILE_READ_ERROR: u8 = 3;
const EXIT_MULTIPLE_ACTIONS: u8 = 4;
const EXIT_PARSE_INCOMPLETE: u8 = 6;
const EXIT_BAD_FILTER: u8 = 10;

#[derive(Parser)]
#[command(name = "jsonsieve")]
#[command(version)]
#[command(about = "Process JSON from FILEs or standard input", long_about = None)]
struct Cli {
    /// Verify the input is valid JSON (default action)
    #[arg(short, long)]
    check: bool,

    /// Re-emit the input JSON in pretty format
    #[arg(short, long)]
    pprint: bool,

    /// Output the part of the input selected by the filter string, as
    /// elements of a JSON array. A filter is one or more value paths
    /// (e.g. `.abc[]`) delimited by `|`
    #[arg(short, long, value_name = "STR")]
    filter: Option<String>,

    /// Abort parsing once the JSON tree reaches this depth (0 = no limit)
    #[arg(long, value_name = "VAL", default_value_t = 0)]
    abort_depth: u32,

    /// Indent string used by --pprint
    #[arg(long, value_name = "STR", default_value = "  ")]
    indent: String,

    /// Input files; standard input is processed when none are given
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,
}

enum Action {
    Check,
    PrettyPrint,
    Filter(Vec<ValuePath>),
}

fn resolve_action(cli: &Cli) -> Result<Action, ExitCode> {
    let picked = usize::from(cli.check) + usize::from(cli.pprint) + usize::from(cli.filter.is_some());
    if picked > 1 {
        eprintln!("jsonsieve: at most one of --check, --pprint, --filter may be given");
        return Err(ExitCode::from(EXIT_MULTIPLE_ACTIONS));
    }
    if cli.pprint {
        return Ok(Action::PrettyPrint);
    }
    if let Some(filter) = &cli.filter {
        let paths = ValuePath::parse_filter(filter).map_err(|err| {
            eprintln!("jsonsieve: bad filter {filter:?}: {err}");
            ExitCode::from(EXIT_BAD_FILTER)
        })?;
        return Ok(Action::Filter(paths));
    }
    Ok(Action::Check)
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>, ExitCode> {
    let result = match path {
        Some(path) => fs::read(path),
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data).map(|_| data)
        }
    };
    result.map_err(|err| {
        let name = path.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
        eprintln!("jsonsieve: {name}: {err}");
        ExitCode::from(EXIT_FILE_READ_ERROR)
    })
}

fn report_parse_error(err: &ParseError, input: &[u8]) {
    // Show a short snippet around the failure offset for context.
    let start = err.offset.saturating_sub(8);
    let end = input.len().min(err.offset + 8);
    eprintln!(
        "jsonsieve: parse failed: {err} near {:?}",
        BStr::new(&input[start..end])
    );
}

fn check_complete(complete: bool) -> Result<(), ExitCode> {
    if complete {
        Ok(())
    } else {
        eprintln!("jsonsieve: JSON input incomplete");
        Err(ExitCode::from(EXIT_PARSE_INCOMPLETE))
    }
}

fn run_check(input: &[u8], options: ParserOptions) -> Result<(), ExitCode> {
    let mut parser = JsonParser::with_options(NullConsumer, options);
    match parser.parse(input) {
        Ok(complete) => check_complete(complete),
        Err(err) => {
            report_parse_error(&err, input);
            Err(ExitCode::from(EXIT_PARSE_ERROR))
        }
    }
}

fn run_pretty_print(input: &[u8], options: ParserOptions, indent: &str) -> Result<(), ExitCode> {
    let mut parser = JsonParser::with_options(EchoConsumer::with_indent(indent), options);
    match parser.parse(input) {
        Ok(complete) => {
            let mut stdout = io::stdout().lock();
            let written = stdout
                .write_all(parser.into_consumer().output())
                .and_then(|()| stdout.write_all(b"\n"));
            written.map_err(|err| {
                eprintln!("jsonsieve: write failed: {err}");
                ExitCode::from(EXIT_FILE_READ_ERROR)
            })?;
            check_complete(complete)
        }
        Err(err) => {
            report_parse_error(&err, input);
            Err(ExitCode::from(EXIT_PARSE_ERROR))
        }
    }
}

fn run_filter(input: &[u8], options: ParserOptions, paths: &[ValuePath]) -> Result<(), ExitCode> {
    let selected: RefCell<Vec<u8>> = RefCell::new(Vec::from(&b"["[..]));
    let mut dispatcher = PathDispatcher::new();
    for path in paths {
        let selected = &selected;
        dispatcher.register(path, move |kind, _path, raw| {
            let mut out = selected.borrow_mut();
            if out.len() > 1 {
                out.push(b',');
            }
            if kind == ValueKind::String {
                out.push(b'"');
                out.extend_from_slice(raw);
                out.push(b'"');
            } else {
                out.extend_from_slice(raw);
            }
            Ok(())
        });
    }
    let mut parser = JsonParser::with_options(dispatcher, options);
    let parsed = parser.parse(input);
    drop(parser);
    match parsed {
        Ok(complete) => {
            let mut out = selected.into_inner();
            out.extend_from_slice(b"]\n");
            let written = io::stdout().lock().write_all(&out);
            written.map_err(|err| {
                eprintln!("jsonsieve: write failed: {err}");
                ExitCode::from(EXIT_FILE_READ_ERROR)
            })?;
            check_complete(complete)
        }
        Err(err) => {
            report_parse_error(&err, input);
            Err(ExitCode::from(EXIT_PARSE_ERROR))
        }
    }
}

fn run(action: &Action, cli: &Cli, input: &[u8]) -> Result<(), ExitCode> {
    let options = ParserOptions {
        depth_limit: cli.abort_depth,
    };
    match action {
        Action::Check => run_check(input, options),
        Action::PrettyPrint => run_pretty_print(input, options, &cli.indent),
        Action::Filter(paths) => run_filter(input, options, paths),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let action = match resolve_action(&cli) {
        Ok(action) => action,
        Err(code) => return code,
    };

    if cli.files.is_empty() {
        let input = match read_input(None) {
            Ok(input) => input,
            Err(code) => return code,
        };
        if let Err(code) = run(&action, &cli, &input) {
            return code;
        }
    } else {
        for file in &cli.files {
            let input = match read_input(Some(file)) {
                Ok(input) => input,
                Err(code) => return code,
            };
            if let Err(code) = run(&action, &cli, &input) {
                return code;
            }
        }
    }
    ExitCode::SUCCESS
}
