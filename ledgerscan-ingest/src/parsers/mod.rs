//! Bank-specific statement strategies

pub mod commbank;
pub mod nab;

pub use commbank::CommBankFormat;
pub use nab::NabFormat;

fn owned_tokens(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|t| t.to_string()).collect()
}
