//! Item commands.
//!
//! `securestore set|get|remove|clear`, each mapping onto one
//! [`SecureStore`] operation.

use std::io::{self, BufRead, Read, Write};

use clap::Args;
use securestore::{SecretValue, SecureStore};

/// Arguments for `securestore set`.
#[derive(Args)]
pub struct SetArgs {
    /// Item key
    pub key: String,

    /// Value to store (if omitted, prompts for hidden input)
    #[arg(long, conflicts_with = "stdin")]
    pub value: Option<String>,

    /// Read the value from standard input
    #[arg(long)]
    pub stdin: bool,
}

/// Read the value to store from the flag, stdin, or a hidden prompt.
fn read_value(args: &SetArgs) -> anyhow::Result<SecretValue> {
    if let Some(value) = &args.value {
        return Ok(SecretValue::new(value.as_str()));
    }

    if args.stdin {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes)?;
        // A single trailing newline comes from `echo`, not from the secret
        if bytes.last() == Some(&b'\n') {
            bytes.pop();
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
        }
        return Ok(SecretValue::from_utf8(bytes)?);
    }

    let prompt = format!("Enter value for '{}': ", args.key);
    let value = rpassword::prompt_password(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to read value: {}", e))?;
    Ok(SecretValue::new(value))
}

/// Store a value.
pub fn set(store: &SecureStore, args: &SetArgs) -> anyhow::Result<()> {
    let value = read_value(args)?;
    store.set_value(&args.key, value.expose())?;
    println!("Stored '{}' in {}.", args.key, store.queryable());
    Ok(())
}

/// Print a value to stdout.
pub fn get(store: &SecureStore, key: &str) -> anyhow::Result<()> {
    match store.get_value(key)? {
        Some(value) => {
            println!("{}", value.expose());
            Ok(())
        }
        None => anyhow::bail!("No value stored for '{}' in {}", key, store.queryable()),
    }
}

/// Remove a value.
pub fn remove(store: &SecureStore, key: &str) -> anyhow::Result<()> {
    store.remove_value(key)?;
    println!("Removed '{}' from {}.", key, store.queryable());
    Ok(())
}

/// Remove every value in the namespace, after confirmation unless `yes`.
pub fn clear(store: &SecureStore, yes: bool) -> anyhow::Result<()> {
    if !yes {
        let stdin = io::stdin();
        if !confirm(
            &format!("Remove every value in {}? [y/N] ", store.queryable()),
            &mut stdin.lock(),
        )? {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.remove_all_values()?;
    println!("Removed all values from {}.", store.queryable());
    Ok(())
}

/// Ask a yes/no question; anything but `y`/`yes` means no.
fn confirm(prompt: &str, input: &mut impl BufRead) -> anyhow::Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
