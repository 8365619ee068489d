//! Interactive decision points.
//!
//! The organizer never reads from a terminal itself; everything that needs a
//! human goes through [`Prompt`], so tests can answer ahead of time.

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("no options to choose from: {0}")]
    NoOptions(String),
    #[error("input closed")]
    Closed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub trait Prompt {
    /// Ask a yes/no question. `default` is used when the answer is empty.
    fn ask_yes_no(&mut self, question: &str, default: Option<bool>) -> Result<bool, PromptError>;

    /// Pick one of `options`, returning its index.
    fn ask_choice(&mut self, question: &str, options: &[String]) -> Result<usize, PromptError>;

    fn ask_text(&mut self, question: &str) -> Result<String, PromptError>;
}

/// Answers that assume "yes" everywhere and never read input.
///
/// Choices take the first option; text questions have no sensible answer and
/// fail.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn ask_yes_no(&mut self, question: &str, _default: Option<bool>) -> Result<bool, PromptError> {
        log::info!("{} [assuming yes]", question);
        Ok(true)
    }

    fn ask_choice(&mut self, question: &str, options: &[String]) -> Result<usize, PromptError> {
        if options.is_empty() {
            return Err(PromptError::NoOptions(question.to_string()));
        }
        log::info!("{} [assuming {}]", question, options[0]);
        Ok(0)
    }

    fn ask_text(&mut self, _question: &str) -> Result<String, PromptError> {
        Err(PromptError::Closed)
    }
}
