pub mod app;
pub mod mover;
pub mod organize;
pub mod prompt;
pub mod scan;
pub mod show_map;

#[derive(Debug, thiserror::Error)]
pub enum FiletoolsAppError {
    #[error(transparent)]
    Config(#[from] app::ConfigError),
    #[error(transparent)]
    Rules(#[from] filetools_core::RulesError),
    #[error(transparent)]
    Index(#[from] show_map::IndexError),
    #[error(transparent)]
    Move(#[from] mover::MoveError),
    #[error(transparent)]
    Prompt(#[from] prompt::PromptError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
