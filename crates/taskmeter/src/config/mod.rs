//! Configuration module for taskmeter.

use anyhow::{Context, Result, anyhow};
use std::io::{self, Write};
use std::path::Path;

pub mod keybindings;

pub use keybindings::{Action, KeyBindingsConfig, ViewType};

/// Write the default configuration file (storage, autosave and keybindings).
pub fn init_config(output: Option<&Path>, force: bool) -> Result<()> {
    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => keybindings::default_config_path()
            .ok_or_else(|| anyhow!("failed to determine the configuration directory"))?,
    };

    write_default_config(&output_path, force)
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force && !confirm_overwrite(path)? {
        println!("Aborted.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let content = keybindings::generate_default_config_toml()?;

    std::fs::write(path, content)
        .with_context(|| format!("failed to write configuration file: {}", path.display()))?;

    println!("✓ Wrote configuration file: {}", path.display());
    println!();
    println!("Edit this file to change where tasks are stored or how keys are bound.");
    println!("Restart taskmeter tui for changes to take effect.");

    Ok(())
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("File already exists: {}\nOverwrite? [y/N]: ", path.display());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
