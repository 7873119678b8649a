//! Prints a bcrypt hash of the given password for `ADMIN_HASH_PASSWORD`.

use bcrypt::{hash, DEFAULT_COST};
use std::env;

fn main() {
    let password = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --bin hash-password <ADMIN_PASSWORD>");
        std::process::exit(1);
    });

    if password.len() < 8 {
        eprintln!("Warning: admin passwords shorter than 8 characters are easy to guess.");
    }

    match hash(&password, DEFAULT_COST) {
        Ok(hashed) => {
            println!("\nCost : {DEFAULT_COST}");
            println!("Hash : {hashed}\n");
            println!("# Paste this into your .env to replace ADMIN_PASSWORD:");
            println!("ADMIN_HASH_PASSWORD={hashed}");
        }
        Err(e) => {
            eprintln!("Error hashing password: {e}");
            std::process::exit(1);
        }
    }
}
