use std::{fs, process::ExitCode};

use clap::Parser;
use tensorpad::{
    interpreter::{
        evaluator::{
            core::{Context, EvalOptions, MAX_CALL_DEPTH, MAX_ITERATIONS},
            function::output::OutputRecord,
            graph::sample_all,
        },
        value::core::Value,
    },
    run_with_options,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// tensorpad evaluates notebook-style programs over numbers and tensors.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells tensorpad to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Only print errors.
    #[arg(short, long)]
    quiet: bool,

    /// Iterations a single for-loop may run before it is stopped.
    #[arg(long, default_value_t = MAX_ITERATIONS)]
    max_iterations: usize,

    /// How deep user functions may call each other.
    #[arg(long, default_value_t = MAX_CALL_DEPTH)]
    max_call_depth: usize,

    /// Print this many subdivisions of sampled points for every graph.
    #[arg(short, long)]
    samples: Option<usize>,

    /// Log evaluation details to stderr.
    #[arg(short, long)]
    verbose: bool,

    contents: String,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr))
                                  .with(filter)
                                  .init();
}

/// 1-based line of a byte offset.
fn line_of(source: &str, offset: usize) -> usize {
    source.get(..offset).unwrap_or(source).matches('\n').count() + 1
}

fn print_record(record: &OutputRecord, samples: Option<usize>) {
    match record {
        OutputRecord::Print { title: Some(title), value } => println!("{title}: {value}"),
        OutputRecord::Print { title: None, value } => println!("{value}"),
        OutputRecord::Graph { functions,
                              domain_start,
                              domain_end, } => {
            println!("graph of {} function(s) over [{domain_start}, {domain_end}]",
                     functions.len());
            let Some(subdivisions) = samples else {
                return;
            };
            match sample_all(functions, *domain_start, *domain_end, subdivisions) {
                Ok(series) => {
                    for (function, points) in functions.iter().zip(series) {
                        let points = points.iter()
                                           .map(|(x, y)| format!("({}, {})", Value::Number(*x), Value::Number(*y)))
                                           .collect::<Vec<_>>();
                        println!("  {}: {}", function.name, points.join(" "));
                    }
                },
                Err(e) => println!("  sampling failed: {e}"),
            }
        },
        OutputRecord::Plot { point_lists } => {
            for points in point_lists {
                println!("plot: {points}");
            }
        },
    }
}

fn report(context: &Context, source: &str, args: &Args) {
    if !args.quiet {
        for record in &context.results {
            print_record(record, args.samples);
        }
    }

    for error in &context.errors {
        eprintln!("line {}: {error}", line_of(source, error.span().start));
    }

    if !args.quiet && !context.program_result.is_error() {
        println!("{}", context.program_result);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let script = if args.file {
        match fs::read_to_string(&args.contents) {
            Ok(script) => script,
            Err(_) => {
                eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                          &args.contents);
                return ExitCode::FAILURE;
            },
        }
    } else {
        args.contents.clone()
    };

    let options = EvalOptions { max_iterations: args.max_iterations,
                                max_call_depth: args.max_call_depth, };
    let context = run_with_options(&script, options);
    report(&context, &script, &args);

    if context.errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
