use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Blocking question/answer interaction with the user.
///
/// Questions go to stderr so stdout stays free; answers come from stdin.
/// Tests drive the flow through [`Prompter`] over in-memory buffers.
pub trait Prompt {
    /// Ask `question` and return the trimmed answer, or `None` once input is
    /// exhausted.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;

    /// Tell the user something between questions (e.g. why an answer was
    /// rejected).
    fn tell(&mut self, message: &str) -> Result<()>;

    /// Ask a yes/no question, re-asking until the answer is `y`, `yes`, `n`,
    /// `no` or empty (which picks the default). End of input declines, so a
    /// closed stdin never consents to an install.
    fn confirm(&mut self, question: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
        let question = format!("{} {}", question, hint);
        loop {
            let Some(answer) = self.ask(&question)? else {
                return Ok(false);
            };
            match parse_yes_no(&answer) {
                Some(YesNo::Default) => return Ok(default_yes),
                Some(YesNo::Yes) => return Ok(true),
                Some(YesNo::No) => return Ok(false),
                None => self.tell("Please answer 'y' or 'n'.")?,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YesNo {
    Yes,
    No,
    Default,
}

fn parse_yes_no(answer: &str) -> Option<YesNo> {
    match answer.trim().to_lowercase().as_str() {
        "" => Some(YesNo::Default),
        "y" | "yes" => Some(YesNo::Yes),
        "n" | "no" => Some(YesNo::No),
        _ => None,
    }
}

/// [`Prompt`] over any line reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl Prompter<io::StdinLock<'static>, io::Stderr> {
    /// Prompter on the process's stdin and stderr.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompt for Prompter<R, W> {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", question).context("failed to write prompt")?;
        self.output.flush().context("failed to write prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read answer from stdin")?;
        if read == 0 {
            writeln!(self.output).context("failed to write prompt")?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn tell(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message).context("failed to write prompt")?;
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use std::io::Cursor;

    use super::Prompter;

    pub type Scripted = Prompter<Cursor<Vec<u8>>, Vec<u8>>;

    /// Prompter that answers with `answers`, one per line, then hits EOF.
    pub fn scripted(answers: &[&str]) -> Scripted {
        let mut input = answers.join("\n");
        if !answers.is_empty() {
            input.push('\n');
        }
        Prompter::new(Cursor::new(input.into_bytes()), Vec::new())
    }

    /// Everything the prompter wrote, as text.
    pub fn transcript(prompter: Scripted) -> String {
        String::from_utf8(prompter.output).expect("utf-8 transcript")
    }
}
