use colored::Colorize;

/// Print a success message to stderr with a green checkmark prefix.
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a warning message to stderr with a yellow warning prefix.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message to stderr with a red cross prefix.
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print an informational message to stderr with a blue info prefix.
pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue(), msg);
}

/// Print a bold header/section title to stderr, preceded by a blank line.
pub fn header(msg: &str) {
    eprintln!();
    eprintln!("{}", msg.bold());
}

/// Print a block of plain text (instructions, command listings) to stderr.
pub fn block(text: &str) {
    eprintln!("{}", text);
}

/// Print the startup banner.
pub fn banner() {
    let rule = "=".repeat(72);
    eprintln!("{}", rule);
    eprintln!("{}", " Python version & pyenv-virtualenv setup helper".bold());
    eprintln!("{}", rule);
    eprintln!();
}

/// Create a progress spinner with the given message.
///
/// The spinner ticks at 80ms intervals and uses braille-dot characters.
/// Call `.finish_and_clear()` when done. Nothing is drawn when stderr is not
/// a terminal.
pub fn spinner(msg: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.green} {msg}")
            .expect("valid spinner template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
