use accent_dict::{
    accent_partition, homograph_partition, unresolvable_partition, AccentDictionary,
    DictionaryStore, Entry, MergePolicy, SizeDelta,
};
use accent_parser::{ingest, parse_key, Accentizer, FeedStats, Observation};
use accent_protocol::text::{mark_stress, strip_stress};
use accent_protocol::{AccentPartition, HomographPartition, UnresolvablePartition};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Builds and queries a Russian stress dictionary")]
struct Cli {
    /// Directory holding the dictionary partitions
    #[arg(short, long, value_name = "DIR", default_value = "dictionary", global = true)]
    dict: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record observations from JSON-lines feeds
    Ingest {
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Demote agreeing homographs before saving
        #[arg(long)]
        compact: bool,

        /// Turn resolved words into homographs on their first tagged observation
        #[arg(long)]
        eager_seeding: bool,
    },
    /// Demote homographs whose readings all agree
    Compact,
    /// Show what the dictionary knows about a word form
    Lookup {
        word: String,

        /// Grammatical key, e.g. "стоить VERB Number=Sing|Person=3"
        #[arg(short, long)]
        key: Option<String>,

        /// Also mark words with a single vowel
        #[arg(long)]
        single_vowel: bool,
    },
    /// Place stress marks on text (argument or stdin)
    Accentize {
        text: Option<String>,

        #[arg(long)]
        single_vowel: bool,
    },
    /// Dump all partitions as JSON
    Export {
        #[arg(value_name = "FILE")]
        output: PathBuf,
    },
    /// Print partition sizes
    Stats,
}

#[derive(Serialize)]
struct Export {
    accents: AccentPartition,
    homographs: HomographPartition,
    unresolvable: UnresolvablePartition,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store = DictionaryStore::new(&cli.dict);

    match cli.command {
        Command::Ingest { files, compact, eager_seeding } => {
            let policy = if eager_seeding {
                MergePolicy::EagerSeeding
            } else {
                MergePolicy::Conservative
            };
            let mut dict = store
                .load_with_policy(policy)
                .with_context(|| format!("loading dictionary from {}", cli.dict.display()))?;

            let mut stats = FeedStats::default();
            for path in &files {
                ingest_file(&mut dict, path, &mut stats)?;
            }
            println!(
                "{} observations: {} changes, {} conflicts, {} trivial, {} rejected",
                stats.observations, stats.changes, stats.conflicts, stats.trivial, stats.rejected
            );

            if compact {
                println!("compacted {} homographs", dict.compact());
            }
            save(&store, &mut dict)?;
        }
        Command::Compact => {
            let mut dict = store.load()?;
            println!("compacted {} homographs", dict.compact());
            save(&store, &mut dict)?;
        }
        Command::Lookup { word, key, single_vowel } => {
            let dict = store.load()?;
            let word = strip_stress(&word);
            let key = key.as_deref().map(parse_key).transpose()?;

            match dict.entry(&word) {
                None => println!("{}: unknown", word),
                Some(entry) => print_entry(&word, entry),
            }

            let stress = match &key {
                Some(key) => dict.stress(&word, Some(key)),
                None => Accentizer::new(&dict).with_single_vowel(single_vowel).stress_of(&word),
            };
            if let Some(marked) = stress.and_then(|position| mark_stress(&word, position)) {
                println!("stress: {}", marked);
            }
        }
        Command::Accentize { text, single_vowel } => {
            let dict = store.load()?;
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer).context("reading stdin")?;
                    buffer
                }
            };
            let accentizer = Accentizer::new(&dict).with_single_vowel(single_vowel);
            print!("{}", accentizer.accentize(&text));
            io::stdout().flush()?;
        }
        Command::Export { output } => {
            let dict = store.load()?;
            let export = Export {
                accents: accent_partition(&dict),
                homographs: homograph_partition(&dict),
                unresolvable: unresolvable_partition(&dict),
            };
            let file = File::create(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &export)?;
            writer.flush()?;
            println!("exported {} entries to {}", dict.len(), output.display());
        }
        Command::Stats => {
            let dict = store.load()?;
            let sizes = dict.sizes();
            println!("dictionary:               {}", store.dir().display());
            println!("accents:                  {}", sizes.accents);
            println!("homographs:               {}", sizes.homographs);
            println!("homographs_unresolvable:  {}", sizes.unresolvable);
        }
    }

    Ok(())
}

fn ingest_file(
    dict: &mut AccentDictionary,
    path: &Path,
    stats: &mut FeedStats,
) -> anyhow::Result<()> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let observation: Observation = match serde_json::from_str(&line) {
            Ok(observation) => observation,
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    line = number + 1,
                    error = %e,
                    "skipping malformed line"
                );
                stats.rejected += 1;
                continue;
            }
        };

        let result = ingest(dict, &observation);
        if let Err(e) = &result {
            tracing::warn!(
                file = %path.display(),
                line = number + 1,
                error = %e,
                "rejected observation"
            );
        }
        stats.record(&result);
    }
    Ok(())
}

fn save(store: &DictionaryStore, dict: &mut AccentDictionary) -> anyhow::Result<()> {
    match store.save_if_changed(dict)? {
        Some(delta) => print_delta(delta),
        None => println!("no changes"),
    }
    Ok(())
}

fn print_delta(delta: SizeDelta) {
    println!("accents:                  {:+}", delta.accents);
    println!("homographs:               {:+}", delta.homographs);
    println!("homographs_unresolvable:  {:+}", delta.unresolvable);
}

fn print_entry(word: &str, entry: Entry<'_>) {
    println!("{}: {}", word, entry.state());
    match entry {
        Entry::Resolved(position) => {
            if let Some(marked) = mark_stress(word, position) {
                println!("  {}", marked);
            }
        }
        Entry::Homograph(homograph) => {
            for (reading, position) in homograph.readings() {
                let marked = mark_stress(word, position).unwrap_or_else(|| word.to_owned());
                println!("  {}  {}", marked, reading);
            }
        }
        Entry::Unresolvable(unresolvable) => {
            for (reading, positions) in unresolvable.readings() {
                let marked: Vec<String> = positions
                    .iter()
                    .filter_map(|&position| mark_stress(word, position))
                    .collect();
                println!("  {}  {}", marked.join(" / "), reading);
            }
        }
    }
}
