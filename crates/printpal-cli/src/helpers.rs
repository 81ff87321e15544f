//! Shared CLI helpers — banner and status-line printing.

use colored::Colorize;

/// Print an assistant reply to stdout.
pub fn print_reply(reply: &str) {
    println!();
    println!("{}", "🖨️ Printpal".cyan().bold());
    if reply.is_empty() {
        println!("{}", "(no reply)".dimmed());
    } else {
        println!("{reply}");
    }
    println!();
}

/// Print a per-turn error without leaving the conversation.
pub fn print_error(message: &str) {
    eprintln!();
    eprintln!("{} {}", "✗".red().bold(), message.red());
    eprintln!();
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🖨️ Printpal".cyan().bold(), version.dimmed());
    println!(
        "{}",
        "Ask me anything about 3D printing. Type \"exit\" to quit, \"/clear\" to start over."
            .dimmed()
    );
    println!();
}

/// Placeholder while the model is loading (the slow, once-only part).
pub fn print_loading() {
    eprint!("{}", "⠿ loading the 3D-printing specialist...".dimmed());
}

/// Placeholder while a reply is being generated.
pub fn print_thinking() {
    eprint!("{}", "⠿ thinking...".dimmed());
}

/// Clear whatever placeholder is on the status line.
pub fn clear_status_line() {
    eprint!("\r{}\r", " ".repeat(48));
}

/// Confirmation after `/clear`.
pub fn print_cleared() {
    println!("{}", "(conversation cleared)".dimmed());
}
