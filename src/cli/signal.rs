use std::io::Write;

use anyhow::Result;

/// Exit status after an interrupt.
pub const INTERRUPTED_EXIT_CODE: i32 = 1;

/// Tell the user the run was cut short and return the status to exit with.
pub fn report_interrupt(out: &mut dyn Write) -> i32 {
    let _ = writeln!(out);
    let _ = writeln!(out, "Interrupted by user.");
    let _ = out.flush();
    INTERRUPTED_EXIT_CODE
}

/// Exit with status 1 on SIGINT or SIGTERM, after telling the user why.
///
/// Children started in the foreground get the same signal from the terminal,
/// so nothing needs to be forwarded.
#[cfg(unix)]
pub fn install_interrupt_handler() -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    std::thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            tracing::debug!(signal = sig, "received signal");
            let code = report_interrupt(&mut std::io::stderr());
            std::process::exit(code);
        }
    });
    Ok(())
}

/// Ctrl-C keeps its default behavior off unix.
#[cfg(not(unix))]
pub fn install_interrupt_handler() -> Result<()> {
    Ok(())
}
