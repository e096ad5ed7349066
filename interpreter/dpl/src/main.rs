//! dpl CLI.
//!
//! Runs a script file: output chunks stream to stdout, draw commands print
//! as one JSON line each.

use std::io::Write;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use dpl::{draw_to_json, ExecOptions};

fn print_usage() {
    eprintln!("Usage: dpl <file.dpl> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --steps=<n>    Execution step budget (default 1000000)");
    eprintln!("  --depth=<n>    Maximum call depth (default 500)");
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut options = ExecOptions::default();
    let mut path = None;

    for arg in args.iter().skip(1) {
        if let Some(steps) = arg.strip_prefix("--steps=") {
            match steps.parse() {
                Ok(n) => options.step_budget = n,
                Err(_) => {
                    eprintln!("error: invalid --steps value `{steps}`");
                    return ExitCode::FAILURE;
                }
            }
        } else if let Some(depth) = arg.strip_prefix("--depth=") {
            match depth.parse() {
                Ok(n) => options.max_call_depth = n,
                Err(_) => {
                    eprintln!("error: invalid --depth value `{depth}`");
                    return ExitCode::FAILURE;
                }
            }
        } else if arg.starts_with('-') {
            eprintln!("error: unknown option `{arg}`");
            print_usage();
            return ExitCode::FAILURE;
        } else if path.is_none() {
            path = Some(arg.clone());
        } else {
            eprintln!("error: more than one input file");
            return ExitCode::FAILURE;
        }
    }

    let Some(path) = path else {
        print_usage();
        return ExitCode::FAILURE;
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read {path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut host = dpl::CallbackHost::new(
        |chunk| {
            print!("{chunk}");
            let _ = std::io::stdout().flush();
        },
        |command| println!("{}", draw_to_json(&command)),
    );

    match dpl::exec_opts(&source, &mut host, options) {
        Ok(_) => ExitCode::SUCCESS,
        // The diagnostic already went through the output callback.
        Err(_) => ExitCode::FAILURE,
    }
}
