use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process::ExitCode,
};

use calc::{
    env::UnboundPolicy,
    session::{Session, SessionConfig, Step},
};
use clap::Parser;

/// Evaluates every statement of a script and prints the results, one per line.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Read names that were never assigned as zero instead of failing.
    #[arg(short, long)]
    lenient: bool,

    /// The script to evaluate. Standard input is read when it is left out.
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    calc::init_logging();
    let args = Args::parse();

    let script = match read_script(args.script.as_ref()) {
        Ok(script) => script,
        Err(error) => {
            eprintln!("Failed to read the script: {error}");
            return ExitCode::from(2);
        }
    };

    let config = SessionConfig {
        unbound: if args.lenient {
            UnboundPolicy::Zero
        } else {
            UnboundPolicy::Error
        },
        ..SessionConfig::default()
    };

    let mut failures = 0usize;
    let mut session = Session::with_config(script.chars(), config);
    let outcome = session.run(|step| match step {
        Step::Value(value) => println!("{value}"),
        Step::Failed(error) => {
            failures += 1;
            eprintln!("{error}");
        }
        Step::Quit | Step::EndOfInput => {}
    });

    match outcome {
        Ok(()) => {
            tracing::info!(failures, "script finished");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("Exception: {error}");
            ExitCode::FAILURE
        }
    }
}

fn read_script(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}
