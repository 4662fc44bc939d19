use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing::*;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};
use wordtok::{
    DataLoader, LoaderConfig, SubwordEncoder, SubwordEncoding, TokenCodec, TokenInt,
    UnknownTokenPolicy, VocabTokenizer, VocabularyPolicy, WindowedDataset,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    globals: Globals,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Globals {
    /// Read data loader settings from a JSON file
    #[arg(short, long, value_name = "FILE", global = true, env = "WORDTOK_CONFIG")]
    config: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    debug: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a vocabulary from a corpus file and print it
    Vocab {
        corpus: PathBuf,

        /// Number tokens by position in the corpus instead of sorting them
        #[arg(long)]
        positional: bool,
    },

    /// Encode text with the vocabulary of a corpus file, printing the ids as JSON
    Encode {
        corpus: PathBuf,

        text: String,

        /// Encode tokens missing from the vocabulary as <|unk|> instead of failing
        #[arg(long)]
        substitute_unknown: bool,
    },

    /// Decode ids with the vocabulary of a corpus file
    Decode {
        corpus: PathBuf,

        #[arg(required = true)]
        ids: Vec<TokenInt>,
    },

    /// Slice a text file into windowed (input, target) pairs, printed as JSON lines
    Windows {
        file: PathBuf,

        #[command(flatten)]
        window: WindowArgs,

        /// Tokenize with a vocabulary built from the file itself instead of a subword encoding
        #[arg(long, conflicts_with = "encoding")]
        vocab: bool,

        /// Print at most this many pairs
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print one epoch of batches of windowed pairs from a text file, as JSON lines
    Batches {
        file: PathBuf,

        #[command(flatten)]
        window: WindowArgs,

        #[arg(long)]
        batch_size: Option<usize>,

        /// Seed for shuffling the pairs
        #[arg(long)]
        seed: Option<u64>,

        /// Keep the dataset order instead of shuffling
        #[arg(long)]
        no_shuffle: bool,

        /// Keep a final batch that has fewer pairs than the batch size
        #[arg(long)]
        keep_last: bool,
    },

    /// Build a vocabulary from a corpus file and round trip a short sentence through it
    Demo { corpus: PathBuf },
}

/// Window settings that override the ones from the config file
#[derive(Args)]
struct WindowArgs {
    /// Length of each input and target sequence
    #[arg(long)]
    max_len: Option<usize>,

    /// Distance between the starts of consecutive windows
    #[arg(long)]
    stride: Option<usize>,

    /// Subword encoding to tokenize with
    #[arg(long, value_parser = SubwordEncoding::from_name)]
    encoding: Option<SubwordEncoding>,
}

impl WindowArgs {
    fn apply(&self, config: &mut LoaderConfig) {
        if let Some(max_len) = self.max_len {
            config.max_len = max_len;
        }
        if let Some(stride) = self.stride {
            config.stride = stride;
        }
        if let Some(encoding) = self.encoding {
            config.encoding = encoding;
        }
    }
}

fn load_tokenizer(corpus: &Path, policy: VocabularyPolicy) -> anyhow::Result<VocabTokenizer> {
    let text = wordtok::load_text(corpus)?;

    Ok(VocabTokenizer::with_policy(&text, policy)?)
}

/// Log how many tokens of `text` the tokenizer's vocabulary is missing, before encoding it.
fn report_unknown(tokenizer: &VocabTokenizer, text: &str) -> usize {
    let unknown = tokenizer.vocabulary().count_unknown(text);

    if unknown > 0 {
        match tokenizer.unknown_policy() {
            UnknownTokenPolicy::Strict => {
                warn!(unknown, "Text has tokens missing from the vocabulary")
            }
            UnknownTokenPolicy::Substitute => {
                info!(unknown, "Substituting tokens missing from the vocabulary")
            }
        }
    }

    unknown
}

impl Commands {
    fn execute(self, globals: &Globals) -> anyhow::Result<()> {
        use Commands::*;

        let mut config = match &globals.config {
            Some(path) => {
                debug!(path = %path.display(), "Loading config");
                LoaderConfig::load(path)?
            }
            None => LoaderConfig::default(),
        };

        match self {
            Vocab { corpus, positional } => {
                let policy = if positional {
                    VocabularyPolicy::Positional
                } else {
                    VocabularyPolicy::Sorted
                };
                let tokenizer = load_tokenizer(&corpus, policy)?;
                let vocab = tokenizer.vocabulary();

                println!("Vocabulary size: {}", vocab.len());
                for (token, id) in vocab.entries() {
                    println!("{id:>8}  {token}");
                }
            }
            Encode {
                corpus,
                text,
                substitute_unknown,
            } => {
                let policy = if substitute_unknown {
                    UnknownTokenPolicy::Substitute
                } else {
                    UnknownTokenPolicy::Strict
                };
                let tokenizer =
                    load_tokenizer(&corpus, VocabularyPolicy::Sorted)?.with_unknown_policy(policy);
                report_unknown(&tokenizer, &text);

                println!("{}", serde_json::to_string(&tokenizer.encode(&text)?)?);
            }
            Decode { corpus, ids } => {
                let tokenizer = load_tokenizer(&corpus, VocabularyPolicy::Sorted)?;

                println!("{}", tokenizer.decode(&ids)?);
            }
            Windows {
                file,
                window,
                vocab,
                limit,
            } => {
                window.apply(&mut config);
                let text = wordtok::load_text(&file)?;

                let codec: Box<dyn TokenCodec> = if vocab {
                    Box::new(VocabTokenizer::new(&text)?)
                } else {
                    Box::new(SubwordEncoder::new(config.encoding)?)
                };
                let dataset =
                    WindowedDataset::from_text(&text, &codec, config.max_len, config.stride)?;
                info!(pairs = dataset.len(), "Windowed {}", file.display());

                for pair in dataset.iter().take(limit.unwrap_or(usize::MAX)) {
                    println!(
                        "{}",
                        serde_json::json!({ "input": pair.input, "target": pair.target })
                    );
                }
            }
            Batches {
                file,
                window,
                batch_size,
                seed,
                no_shuffle,
                keep_last,
            } => {
                window.apply(&mut config);
                if let Some(batch_size) = batch_size {
                    config.batch_size = batch_size;
                }
                if seed.is_some() {
                    config.seed = seed;
                }
                if no_shuffle {
                    config.shuffle = false;
                }
                if keep_last {
                    config.drop_last = false;
                }

                let text = wordtok::load_text(&file)?;
                let mut loader: DataLoader = wordtok::create_dataloader(&text, &config)?;
                info!(
                    pairs = loader.dataset().len(),
                    batches = loader.num_batches(),
                    "Loaded {}",
                    file.display()
                );

                for batch in loader.batches() {
                    let inputs = batch.inputs().collect::<Vec<_>>();
                    let targets = batch.targets().collect::<Vec<_>>();
                    println!(
                        "{}",
                        serde_json::json!({ "inputs": inputs, "targets": targets })
                    );
                }
            }
            Demo { corpus } => {
                const SAMPLE: &str = "Hello, do you like tea?";

                let tokenizer = load_tokenizer(&corpus, VocabularyPolicy::Sorted)?
                    .with_unknown_policy(UnknownTokenPolicy::Substitute);
                let ids = tokenizer.encode(SAMPLE)?;

                println!("{}", serde_json::to_string(&ids)?);
                println!("{}", tokenizer.decode(&ids)?);
            }
        }

        Ok(())
    }
}

fn main() {
    let cli = Cli::parse();

    let default_log_directive = match cli.globals.debug {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // Log events go to stderr as JSON, so stdout carries only the command's output
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_log_directive.into())
                .from_env_lossy(),
        )
        .json()
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }

    match cli.command {
        None => {
            if let Err(e) = Cli::command().print_help() {
                error!("{:#}", e);
                exit(1);
            }
        }
        Some(command) => {
            if let Err(e) = command.execute(&cli.globals) {
                error!("{:#}", e);
                exit(1);
            } else {
                debug!("command executed successfully");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify that there aren't any invalid attributes in the CLI specification that can only be
    /// detected at runtime
    #[test]
    fn verify_cli() {
        Cli::command().debug_assert()
    }

    #[test]
    fn window_args_override_config() {
        let cli = Cli::try_parse_from([
            "wordtok",
            "windows",
            "verdict.txt",
            "--max-len",
            "4",
            "--encoding",
            "cl100k_base",
        ])
        .unwrap();

        let Some(Commands::Windows { window, .. }) = cli.command else {
            panic!("expected the windows command");
        };
        let mut config = LoaderConfig::default();
        window.apply(&mut config);

        assert_eq!(4, config.max_len);
        assert_eq!(128, config.stride);
        assert_eq!(SubwordEncoding::Cl100kBase, config.encoding);
    }

    #[test]
    fn counts_unknown_tokens_before_encoding() {
        let tokenizer = VocabTokenizer::new("Hello, world").unwrap();

        assert_eq!(0, report_unknown(&tokenizer, "world, Hello"));
        assert_eq!(2, report_unknown(&tokenizer, "Hello there, big world"));

        let tokenizer = tokenizer.with_unknown_policy(UnknownTokenPolicy::Substitute);
        assert_eq!(1, report_unknown(&tokenizer, "Hello, tea"));
    }

    #[test]
    fn unknown_encoding_is_a_parse_error() {
        assert!(Cli::try_parse_from(["wordtok", "windows", "f.txt", "--encoding", "nope"]).is_err());
    }
}
