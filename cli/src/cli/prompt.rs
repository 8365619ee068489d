use std::io::{self, BufRead, Write};

use app::prompt::{Prompt, PromptError};

/// Asks questions on stdout and reads answers line by line from stdin.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl StdinPrompt {
    fn read_line(&self) -> Result<String, PromptError> {
        print!("|| ");
        io::stdout().flush()?;
        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Err(PromptError::Closed);
        }
        Ok(input.trim().to_string())
    }
}

fn parse_yes_no(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

/// A 1-based menu selection, returned 0-based.
fn parse_choice(input: &str, count: usize) -> Option<usize> {
    let re = once_cell_regex::regex!(r"^ *(?P<choice>[0-9]+) *$");
    let idx = re
        .captures(input)?
        .name("choice")?
        .as_str()
        .parse::<usize>()
        .ok()?;
    (1..=count).contains(&idx).then(|| idx - 1)
}

impl Prompt for StdinPrompt {
    fn ask_yes_no(&mut self, question: &str, default: Option<bool>) -> Result<bool, PromptError> {
        loop {
            println!("{} [y/n]?", question);
            let input = self.read_line()?;
            if let Some(answer) = parse_yes_no(&input) {
                return Ok(answer);
            }
            if input.is_empty() {
                if let Some(d) = default {
                    return Ok(d);
                }
            }
            log::warn!("invalid input: {:?}, expected 'y' or 'n'", input);
        }
    }

    fn ask_choice(&mut self, question: &str, options: &[String]) -> Result<usize, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions(question.to_string()));
        }
        loop {
            println!("{}", question);
            for (i, option) in options.iter().enumerate() {
                println!("{}) {}", i + 1, option);
            }
            let input = self.read_line()?;
            if let Some(idx) = parse_choice(&input, options.len()) {
                log::debug!("selected {}: {}", idx + 1, options[idx]);
                return Ok(idx);
            }
            log::warn!(
                "invalid choice: {:?}, expected a number from 1 to {}",
                input,
                options.len()
            );
        }
    }

    fn ask_text(&mut self, question: &str) -> Result<String, PromptError> {
        println!("{}?", question);
        self.read_line()
    }
}
