use thiserror::Error;

/// Errors a player can raise instead of a move.
#[derive(Debug, Error)]
pub enum PlayError {
    #[error("player left the game")]
    Quit,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while validating options or building a board.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config validation error: {0}")]
    Validation(String),

    #[error("a board of {rows} rows and {columns} columns does not fit into 64 bits")]
    BoardTooLarge { rows: usize, columns: usize },
}

/// Errors raised while running a series of games.
#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("game {game} aborted: {source}")]
    Play {
        game: usize,
        #[source]
        source: PlayError,
    },

    #[error("failed to set up a game: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to build thread pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
