use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use sales_dashboard_core::models::filter::FilterField;
use sales_dashboard_core::models::sort::SortKey;

/// One line typed at the dashboard prompt.
#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true,
    help_template = "Commands:\n{subcommands}"
)]
struct PromptLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Edit a filter (start, end, min, email, phone)
    Set {
        field: FilterField,
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Clear a filter
    Clear { field: FilterField },
    /// Apply filters and load the first page
    #[command(alias = "a")]
    Apply,
    /// Next page
    #[command(alias = "n")]
    Next,
    /// Previous page
    #[command(alias = "p")]
    Prev,
    /// Sort the table; repeat to flip direction
    #[command(alias = "s")]
    Sort {
        #[arg(value_enum, ignore_case = true)]
        column: SortColumn,
    },
    /// Hide the error banner
    Dismiss,
    /// Redraw the dashboard
    #[command(alias = "ls")]
    Show,
    /// Show this help
    #[command(alias = "?")]
    Help,
    /// Exit
    #[command(aliases = ["exit", "q"])]
    Quit,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Date,
    #[value(alias = "total")]
    Price,
    /// Back to API order
    #[value(name = "none", alias = "off")]
    Unsorted,
}

impl SortColumn {
    pub fn key(self) -> Option<SortKey> {
        match self {
            SortColumn::Date => Some(SortKey::Date),
            SortColumn::Price => Some(SortKey::Price),
            SortColumn::Unsorted => None,
        }
    }
}

pub fn help() -> String {
    PromptLine::command().render_help().to_string()
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let mut words: Vec<String> = line.split_whitespace().map(str::to_string).collect();
    let Some(head) = words.first_mut() else {
        return Ok(None);
    };
    *head = head.to_lowercase();

    PromptLine::try_parse_from(words)
        .map(|p| Some(p.command))
        .map_err(|e| e.to_string().trim_end().to_string())
}
