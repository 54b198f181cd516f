//! Terminal implementation of the `Interact` port.
//!
//! Uses `dialoguer` prompts when stderr is a terminal and the `interactive`
//! feature is on. Otherwise prompts go to stderr and answers are read line by
//! line from stdin, so scripted input works.

use std::io::{self, BufRead, Write};

use console::Term;

use stubforge_core::{
    application::Interact,
    error::{StubforgeError, StubforgeResult},
};

use crate::output::OutputManager;

pub struct TerminalInteract {
    output: OutputManager,
    rich: bool,
}

impl TerminalInteract {
    pub fn new(output: OutputManager) -> Self {
        Self {
            output,
            rich: cfg!(feature = "interactive") && Term::stderr().is_term(),
        }
    }

    fn read_line(&self, prompt: &str) -> StubforgeResult<Option<String>> {
        let mut stderr = io::stderr();
        write!(stderr, "{prompt}").map_err(prompt_error)?;
        stderr.flush().map_err(prompt_error)?;

        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line).map_err(prompt_error)?;
        Ok((read > 0).then(|| line.trim().to_owned()))
    }
}

impl Interact for TerminalInteract {
    fn ask(&self, prompt: &str) -> StubforgeResult<String> {
        #[cfg(feature = "interactive")]
        if self.rich {
            return dialoguer::Input::<String>::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()
                .map_err(|e| prompt_error(io::Error::other(e)));
        }

        Ok(self.read_line(&format!("{prompt}: "))?.unwrap_or_default())
    }

    fn confirm(&self, question: &str, default: bool) -> StubforgeResult<bool> {
        #[cfg(feature = "interactive")]
        if self.rich {
            return dialoguer::Confirm::new()
                .with_prompt(question)
                .default(default)
                .interact()
                .map_err(|e| prompt_error(io::Error::other(e)));
        }

        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = self.read_line(&format!("{question} {hint} "))?;
        Ok(parse_answer(answer.as_deref(), default))
    }

    fn preview(&self, content: &str) {
        let _ = self.output.header("--------- Preview ---------");
        let _ = self.output.print(content);
        let _ = self.output.header("---------------------------");
    }
}

/// `y`/`yes` and `n`/`no` in any case; anything else keeps the default.
fn parse_answer(answer: Option<&str>, default: bool) -> bool {
    match answer.map(str::to_ascii_lowercase).as_deref() {
        Some("y" | "yes") => true,
        Some("n" | "no") => false,
        _ => default,
    }
}

fn prompt_error(e: io::Error) -> StubforgeError {
    StubforgeError::Internal {
        message: format!("failed to read the answer: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_and_no_in_any_case() {
        assert!(parse_answer(Some("Y"), false));
        assert!(parse_answer(Some("yes"), false));
        assert!(!parse_answer(Some("N"), true));
        assert!(!parse_answer(Some("no"), true));
    }

    #[test]
    fn empty_or_eof_keeps_default() {
        assert!(parse_answer(Some(""), true));
        assert!(!parse_answer(None, false));
        assert!(parse_answer(Some("maybe"), true));
    }
}
