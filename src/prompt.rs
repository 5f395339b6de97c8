#[cfg(test)]
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-oriented operator input. `None` means the input stream is exhausted.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>>;

    /// Only `yes` / `y` (any case) count as consent; end of input declines.
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        Ok(self.ask(question)?.is_some_and(|answer| is_affirmative(&answer)))
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        print!("{}", question);
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

/// Replays pre-supplied answers, then reports end of input.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub asked: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
        }
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        self.asked.push(question.to_string());
        Ok(self.answers.pop_front().map(|a| a.trim().to_string()))
    }
}
