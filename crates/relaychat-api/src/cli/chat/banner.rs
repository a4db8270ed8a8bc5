//! Welcome banner for chat sessions.

use console::style;

use relaychat_types::config::ClientConfig;

/// Print the welcome banner: relay URL, limits and a hint about slash commands.
pub fn print_welcome_banner(config: &ClientConfig) {
    println!();
    println!("  {} {}", style("*").cyan().bold(), style("relaychat").cyan().bold());
    println!();
    println!("  {}    {}", style("Relay:").bold(), style(&config.base_url).dim());
    println!(
        "  {}  {}",
        style("Limits:").bold(),
        style(format!(
            "{} characters, {:.0}s timeout",
            config.max_message_length,
            config.request_timeout().as_secs_f64()
        ))
        .dim()
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
