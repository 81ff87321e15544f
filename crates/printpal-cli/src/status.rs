//! `printpal status` — show configuration and model status.

use anyhow::Result;
use colored::Colorize;

use printpal_core::config::{get_config_path, load_config};
use printpal_core::utils::expand_home;

/// Run the status command.
pub fn run() -> Result<()> {
    let config = load_config(None);
    let config_path = get_config_path();

    println!();
    println!("{}", "🖨️ Printpal Status".cyan().bold());
    println!();

    // Config
    let config_exists = config_path.exists();
    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_exists {
            "✓".green().to_string()
        } else {
            "(not found, using defaults)".dimmed().to_string()
        }
    );

    // Model artifact
    let model_path = expand_home(&config.model.path);
    println!(
        "  {:<18} {} {}",
        "Model:".bold(),
        model_path.display(),
        match std::fs::metadata(&model_path) {
            Ok(meta) => format!("{} ({:.1} GiB)", "✓".green(), meta.len() as f64 / (1 << 30) as f64),
            Err(_) => "(not found)".red().to_string(),
        }
    );

    // Engine settings
    println!(
        "  {:<18} {}",
        "Engine:".bold(),
        format!(
            "ctx: {} | gpu layers: {}",
            config.model.context_window, config.model.gpu_layers
        )
        .dimmed()
    );

    // Generation settings
    println!(
        "  {:<18} {}",
        "Generation:".bold(),
        format!(
            "temp: {} | top_p: {} | max_tokens: {} | stop: {:?}",
            config.generation.temperature,
            config.generation.top_p,
            config.generation.max_tokens,
            config.generation.stop
        )
        .dimmed()
    );

    // Persona
    let persona = if config.persona.is_some() {
        "custom (from config)"
    } else {
        "built-in 3D-printing expert"
    };
    println!("  {:<18} {}", "Persona:".bold(), persona.dimmed());

    println!();
    Ok(())
}
