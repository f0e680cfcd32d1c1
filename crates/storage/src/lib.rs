#![forbid(unsafe_code)]

pub mod json;
pub mod repository;
pub mod sample;

pub use json::{JsonBankSource, QuestionRecord, bank_file_name, write_bank_file};
pub use repository::{
    BankSource, InMemoryBankSource, InMemoryRepository, SessionStore, Storage, StorageError,
};
