use calc::{
    env::UnboundPolicy,
    session::{Session, SessionConfig, Step},
};
use clap::Parser;
use rustyline::DefaultEditor;

/// Evaluates arithmetic statements typed at the prompt. End each statement with `;`, quit with `q`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Read names that were never assigned as zero instead of failing.
    #[arg(short, long)]
    lenient: bool,

    /// The prompt shown for every line of input.
    #[arg(long, default_value = "> ")]
    prompt: String,
}

/// Feeds the session one edited line at a time, asking for a new line only once the previous one is
/// used up.
struct EditorChars {
    editor: DefaultEditor,
    prompt: String,
    line: std::vec::IntoIter<char>,
    closed: bool,
}

impl Iterator for EditorChars {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.line.next() {
                return Some(c);
            }
            if self.closed {
                return None;
            }

            match self.editor.readline(&self.prompt) {
                Ok(line) => {
                    if let Err(error) = self.editor.add_history_entry(line.as_str()) {
                        tracing::warn!(%error, "could not record history");
                    }
                    // Keep the line break so a name or number at the end of the line is terminated
                    let chars: Vec<char> = line.chars().chain(Some('\n')).collect();
                    self.line = chars.into_iter();
                }
                Err(error) => {
                    tracing::info!(%error, "input closed");
                    self.closed = true;
                }
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    calc::init_logging();
    let args = Args::parse();

    let config = SessionConfig {
        unbound: if args.lenient {
            UnboundPolicy::Zero
        } else {
            UnboundPolicy::Error
        },
        prompt: args.prompt,
        ..SessionConfig::default()
    };

    let source = EditorChars {
        editor: DefaultEditor::new()?,
        prompt: config.prompt.clone(),
        line: Vec::new().into_iter(),
        closed: false,
    };

    let result_prefix = config.result_prefix.clone();
    let mut session = Session::with_config(source, config);
    session.run(|step| match step {
        Step::Value(value) => println!("{result_prefix}{value}"),
        Step::Failed(error) => eprintln!("{error}"),
        Step::Quit | Step::EndOfInput => println!("Bye!"),
    })?;

    Ok(())
}
