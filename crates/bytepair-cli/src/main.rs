mod logging;

use std::fs;
use std::path::PathBuf;

use bytepair::vocab::io::{save_merges_path, save_vocab_path};
use bytepair::{PairVocabTrainer, PairVocabTrainerOptions};
use clap::Parser;

use crate::logging::LogArgs;

/// Train a byte-pair vocabulary from a text corpus.
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Path to the UTF-8 training corpus.
    input_path: PathBuf,

    /// Target vocabulary size (256 bytes + merges + special tokens).
    vocab_size: usize,

    /// Directory to write `vocab.txt` and `merges.txt` into.
    output_dir: PathBuf,

    /// Special tokens, in id-assignment order. The first one is the
    /// document separator used to align chunk boundaries.
    #[arg(long = "special-token", default_value = "<|endoftext|>", num_args = 1..)]
    special_tokens: Vec<String>,

    #[clap(flatten)]
    logging: LogArgs,
}

impl Args {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging()?;

        let options = PairVocabTrainerOptions::new(self.vocab_size, &self.special_tokens);
        let mut trainer: PairVocabTrainer = options.init()?;

        trainer.update_from_path(&self.input_path, rayon::current_num_threads())?;

        log::info!("Training vocabulary...");
        let trained = trainer.train::<u32>()?;
        log::info!(
            "Trained {} tokens ({} merges)",
            trained.len(),
            trained.merges().len(),
        );

        fs::create_dir_all(&self.output_dir)?;

        let vocab_path = self.output_dir.join("vocab.txt");
        save_vocab_path(&trained, &vocab_path)?;
        log::info!("vocab: {}", vocab_path.display());

        let merges_path = self.output_dir.join("merges.txt");
        save_merges_path(&trained, &merges_path)?;
        log::info!("merges: {}", merges_path.display());

        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.run()
}
