//! Mutator implementations

pub mod command;
pub mod dictionary;

pub use command::CommandMutator;
pub use dictionary::DictionaryMutator;
