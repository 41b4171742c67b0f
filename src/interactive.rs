//! Interactive shell over the account service.
//!
//! Not part of the core correctness surface: a thin command loop with a
//! static command table and file-backed input history.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use crate::session::AccountService;

/// Static command table: name -> description. Built at compile time so
/// help needs no runtime introspection.
pub const COMMANDS: &[(&str, &str)] = &[
    ("create <handle>", "Create a new account (prompts for password)"),
    ("login <handle>", "Unlock an account into the active session"),
    ("logout", "Tear down the active session"),
    ("delete <handle>", "Delete an account (prompts for password)"),
    ("list", "List known account handles"),
    ("whoami", "Show the active session and its signing key"),
    ("send <to> <amount>", "Sign and submit a transfer (requires login)"),
    ("history", "Show recent shell input"),
    ("help", "Show this command table"),
    ("exit", "Leave the shell"),
];

pub async fn start(service: &AccountService, history_path: &Path) {
    print_banner();

    // Prior history, most recent first
    let mut history = load_history(history_path);
    let mut session_lines: Vec<String> = Vec::new();

    loop {
        let prompt = match service.current_handle().await {
            Some(handle) => format!("{}@sextant> ", handle),
            None => "sextant> ".to_string(),
        };
        print!("{}", prompt);
        let _ = io::stdout().flush();

        let mut line = String::new();
        if io::stdin().read_line(&mut line).is_err() || line.is_empty() {
            break; // EOF
        }
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        session_lines.push(line.clone());
        history.insert(0, line.clone());

        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();

        match command {
            "create" => match args.first() {
                Some(handle) => {
                    let password = prompt_password(&format!("New password for '{}': ", handle));
                    match service.create_account(handle, &password).await {
                        Ok(identity) => println!("Account '{}' created.", identity.handle),
                        Err(e) => println!("Create failed for '{}': {}", handle, e),
                    }
                }
                None => println!("Usage: create <handle>"),
            },
            "login" => match args.first() {
                Some(handle) => {
                    let password = prompt_password(&format!("Password for '{}': ", handle));
                    match service.login(handle, &password).await {
                        Ok(()) => println!("Logged in as '{}'.", handle.to_lowercase()),
                        Err(e) => println!("Login failed for '{}': {}", handle, e),
                    }
                }
                None => println!("Usage: login <handle>"),
            },
            "logout" => match service.logout().await {
                Ok(()) => println!("Logged out."),
                Err(e) => println!("Logout: {}", e),
            },
            "delete" => match args.first() {
                Some(handle) => {
                    let password = prompt_password(&format!("Password for '{}': ", handle));
                    match service.delete_account(handle, &password).await {
                        Ok(()) => println!("Account '{}' deleted.", handle.to_lowercase()),
                        Err(e) => println!("Delete failed for '{}': {}", handle, e),
                    }
                }
                None => println!("Usage: delete <handle>"),
            },
            "list" => {
                let handles = service.handles().await;
                if handles.is_empty() {
                    println!("No accounts.");
                } else {
                    for handle in handles {
                        println!("  {}", handle);
                    }
                }
            }
            "whoami" => match service.current_handle().await {
                Some(handle) => {
                    println!("Active session: {}", handle);
                    if let Some(pubkey) = service.current_signer_pubkey().await {
                        println!("Signing key:    {}", pubkey);
                    }
                }
                None => println!("Not logged in."),
            },
            "send" => match (args.first(), args.get(1).and_then(|a| a.parse::<u64>().ok())) {
                (Some(to), Some(amount)) => match service.submit_transfer(to, amount).await {
                    Ok(txid) => println!("Submitted: {}", txid),
                    Err(e) => println!("Send failed: {}", e),
                },
                _ => println!("Usage: send <to> <amount>"),
            },
            "history" => {
                for line in history.iter().take(20) {
                    println!("  {}", line);
                }
            }
            "help" => print_help(),
            "exit" | "quit" => break,
            _ => println!("Unknown command '{}'. Type 'help'.", command),
        }
    }

    append_history(history_path, &session_lines);
    println!("\nSession ended. Exiting.");
}

fn print_banner() {
    println!("========================================");
    println!("        SEXTANT IDENTITY CLIENT         ");
    println!("========================================");
    println!("Type 'help' for commands.\n");
}

fn print_help() {
    for (name, description) in COMMANDS {
        println!("  {:<22} {}", name, description);
    }
}

fn prompt_password(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut password = String::new();
    let _ = io::stdin().read_line(&mut password);
    password.trim().to_string()
}

/// Load prior history, most recent line first.
fn load_history(path: &Path) -> Vec<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents
            .lines()
            .rev()
            .map(|l| l.to_string())
            .filter(|l| !l.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Append this session's lines to the history file on shell exit.
fn append_history(path: &Path, lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    let file = OpenOptions::new().create(true).append(true).open(path);
    match file {
        Ok(mut file) => {
            for line in lines {
                let _ = writeln!(file, "{}", line);
            }
        }
        Err(e) => eprintln!("Could not persist shell history: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_history_round_trip_most_recent_first() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("history");

        append_history(&path, &["first".to_string(), "second".to_string()]);
        append_history(&path, &["third".to_string()]);

        let history = load_history(&path);
        assert_eq!(history, vec!["third", "second", "first"]);
    }

    #[test]
    fn test_missing_history_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(load_history(&tmp.path().join("absent")).is_empty());
    }

    #[test]
    fn test_command_table_covers_core_operations() {
        for required in ["create", "login", "logout", "delete"] {
            assert!(
                COMMANDS.iter().any(|(name, _)| name.starts_with(required)),
                "missing command: {}",
                required
            );
        }
    }
}
