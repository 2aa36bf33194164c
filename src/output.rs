//! Colored console output for the genesis tool.
//!
//! Color scheme: blue+bold headers, cyan values, green success,
//! red errors, dimmed secondary text.

use crate::genesis::GenesisDoc;
use crate::primitives::{address_to_hex, Address, U256};
use colored::Colorize;
use std::path::Path;

/// Shorten long hex for display: `0x03831853…7fed75`
pub fn abbreviate_hex(hex: &str) -> String {
    if hex.len() <= 20 {
        hex.to_string()
    } else {
        format!("{}…{}", &hex[..10], &hex[hex.len() - 6..])
    }
}

/// Print the identity and contents of a completed genesis document.
pub fn print_genesis_summary(doc: &GenesisDoc) {
    println!();
    println!("{}", "=== Genesis ===".blue().bold());
    println!("  Chain ID:     {}", doc.chain_id.cyan());
    println!("  Genesis time: {}", doc.genesis_time.cyan());

    if let Some(params) = &doc.consensus_params {
        println!(
            "  Block limits: {} bytes, gas {}",
            params.block.max_bytes.to_string().cyan(),
            match params.block.max_gas {
                -1 => "unlimited".to_string().cyan(),
                gas => gas.to_string().cyan(),
            }
        );
    }

    print_validators(doc);

    match &doc.accounts {
        Some(accounts) => {
            let total = accounts
                .total_balance()
                .map_or_else(|| "overflow".to_string(), |t| t.to_string());
            println!(
                "  Accounts:     {} (total balance {})",
                accounts.len().to_string().cyan(),
                total.dimmed()
            );
        }
        None => println!("  Accounts:     {}", "none".dimmed()),
    }
}

/// Print the validator set.
pub fn print_validators(doc: &GenesisDoc) {
    let total = doc
        .total_voting_power()
        .map_or_else(|| "overflow".to_string(), |p| p.to_string());
    println!(
        "  Validators ({}), total power {}:",
        doc.validators.len().to_string().cyan(),
        total.cyan()
    );
    for (i, validator) in doc.validators.iter().enumerate() {
        let key = format!("0x{}", hex::encode(validator.pub_key.as_bytes()));
        println!(
            "    {}. {} {} {} power={}",
            (i + 1).to_string().dimmed(),
            if validator.name.is_empty() { "-" } else { validator.name.as_str() },
            address_to_hex(&validator.coinbase).cyan(),
            format!("{}:{}", validator.pub_key.kind(), abbreviate_hex(&key)).dimmed(),
            validator.power.to_string().cyan()
        );
    }
}

/// Print confirmation that a document was written.
pub fn print_saved(path: &Path) {
    println!("  {} Genesis written to {}", "OK".green().bold(), path.display().to_string().cyan());
}

/// Print confirmation that a document passed validation.
pub fn print_valid(path: &Path) {
    println!("  {} {} is valid", "OK".green().bold(), path.display().to_string().cyan());
}

/// Print the test-credential addresses with their funded balance.
pub fn print_credentials(addresses: &[Address], balance: U256) {
    println!();
    println!("{}", "Test credentials:".blue().bold());
    for (i, address) in addresses.iter().enumerate() {
        println!(
            "    {}. {}",
            (i + 1).to_string().dimmed(),
            address_to_hex(address).cyan()
        );
    }
    println!("  {} {}", "Test balance:".dimmed(), balance.to_string().cyan());
}

/// Print that every credential decrypted to its address.
pub fn print_credentials_verified(count: usize) {
    println!(
        "  {} {} keystores decrypt to their addresses",
        "OK".green().bold(),
        count.to_string().cyan()
    );
}

/// Print a fatal error with its cause chain.
pub fn print_error(err: &eyre::Report) {
    eprintln!("{} {}", "ERROR:".red().bold(), err);
    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abbreviate_hex_short_unchanged() {
        assert_eq!(abbreviate_hex("0x1234"), "0x1234");
        assert_eq!(abbreviate_hex(""), "");
    }

    #[test]
    fn test_abbreviate_hex_long() {
        let key = "0x038318535b54105d4a7aae60c08fc45f9687181b4fdfc625bd1a753fa7397fed75";
        assert_eq!(abbreviate_hex(key), "0x03831853…7fed75");
    }
}
