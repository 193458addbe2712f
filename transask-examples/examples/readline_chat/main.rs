use std::env;
use std::fs;
use std::io::{stdin, stdout, BufRead, Write};
use std::process::exit;

use anyhow::Result;
use log::warn;
use transask::agent::ChatAgent;
use transask::completion::CorpusCompletions;
use transask::tagger::LexiconTagger;
use tracing_subscriber::EnvFilter;

const CORPUS_TEXT: &str = r#"
Paris is the capital of France. Paris is located in northern France.
Paris is known for the Eiffel Tower. Paris is popular because it is full of museums.
The Eiffel Tower was built for the 1889 World's Fair. The Eiffel Tower is located in Paris.
The tuatara is a reptile native to New Zealand. The tuatara is known for its third eye.
The sky is blue because of the scattering of sunlight.
"#;

const QUIT_COMMANDS: [&str; 2] = ["/bye", "/exit"];

/// Prefix of a line that is completed as it is, without question handling.
const RAW_PREFIX: &str = "/raw ";

fn main() -> Result<()> {
    // Initialize logging, records of the log facade are bridged
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    ctrlc::set_handler(move || {
        println!();
        exit(0);
    }).expect("Error setting Ctrl-C handler");

    // an optional text file replaces the built-in corpus
    let corpus = match env::args().nth(1) {
        Some(path) => CorpusCompletions::from_text(&fs::read_to_string(path)?),
        None => CorpusCompletions::from_text(CORPUS_TEXT),
    };
    if corpus.is_empty() {
        warn!("the corpus has no sentences, every question will lack training data");
    }
    let agent = ChatAgent::new(LexiconTagger::default(), corpus);

    println!("Ask me something, e.g. \"where is Paris?\". Type /bye or /exit to quit.");
    let mut lines = stdin().lock().lines();
    loop {
        print!("> ");
        stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if QUIT_COMMANDS.contains(&line) {
            break;
        }
        if let Some(prompt) = line.strip_prefix(RAW_PREFIX) {
            match agent.chat(prompt)? {
                Some(completion) => println!("{} {}", prompt.trim(), completion),
                None => println!("..."),
            }
            continue;
        }
        println!("{}", agent.ask(line)?);
    }
    Ok(())
}
