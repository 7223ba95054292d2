pub mod rates;
pub mod setup;
pub mod ui;

/// How `rates` prints the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Styled terminal table
    #[default]
    Table,
    /// `{ updateTime, rates }` JSON
    Json,
}
