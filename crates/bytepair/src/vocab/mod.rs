//! # Vocabulary Types and IO

pub mod io;

mod token_table;
mod trained_vocab;

#[doc(inline)]
pub use token_table::ByteTokenTable;
#[doc(inline)]
pub use trained_vocab::TrainedVocab;
