use clap::{Args, Parser, Subcommand, ValueEnum};
use domain_events::DEFAULT_LIMIT;

#[derive(Parser, Debug)]
#[command(name = "events", version)]
#[command(about = "Create, query and manage tagged time-interval events")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// MongoDB connection string; overrides MONGODB_URL / MONGO_*
    #[arg(long, global = true)]
    pub mongo_url: Option<String>,

    /// Database name; overrides MONGODB_DATABASE
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Use a throwaway in-memory store instead of MongoDB
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageArgs {
    /// Number of matching events to skip
    #[arg(long, default_value_t = 0)]
    pub skip: u64,

    /// Page size (1-100)
    #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = clap::value_parser!(u64).range(1..=100))]
    pub limit: u64,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Create an event
    AddEvent {
        /// Start date, e.g. "2025-02-10 21:30" or unix seconds
        #[arg(long)]
        start: String,

        /// Optional stop date, strictly after start
        #[arg(long)]
        stop: Option<String>,

        #[arg(long, num_args = 0.., value_delimiter = ',')]
        tags: Vec<String>,
    },

    /// List every event
    ListAllEvents {
        #[command(flatten)]
        page: PageArgs,
    },

    /// List events running now
    ListRunningEvents {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Find events carrying any of the given tags
    SearchEvent {
        #[arg(long, num_args = 1.., value_delimiter = ',', required = true)]
        tags: Vec<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Show one event
    ShowEvent {
        #[arg(long)]
        event_id: String,
    },

    /// Delete an event; ongoing and future events need --force-delete
    DeleteEvent {
        #[arg(long)]
        event_id: String,

        #[arg(long)]
        force_delete: bool,
    },

    /// Delete stopped events, or every event with --force-delete
    DeleteAllEvents {
        #[arg(long)]
        force_delete: bool,
    },

    /// Add tags to an event, or replace them with --replace
    UpdateEventTags {
        #[arg(long)]
        event_id: String,

        #[arg(long, num_args = 1.., value_delimiter = ',', required = true)]
        tags: Vec<String>,

        #[arg(long)]
        replace: bool,
    },

    /// Change the start and stop of an event
    UpdateEventDatetime {
        #[arg(long)]
        event_id: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        stop: Option<String>,
    },

    /// Change the start and stop of every event sharing a tag
    UpdateEventsDatetime {
        #[arg(long, num_args = 1.., value_delimiter = ',', required = true)]
        tags: Vec<String>,

        #[arg(long)]
        start: String,

        #[arg(long)]
        stop: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_event_with_multiple_tags() {
        let cli = Cli::try_parse_from([
            "events",
            "add-event",
            "--start",
            "2025-02-10 21:30",
            "--tags",
            "database",
            "cloud",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::AddEvent {
                start: "2025-02-10 21:30".into(),
                stop: None,
                tags: vec!["database".into(), "cloud".into()],
            }
        );
        assert_eq!(cli.output, OutputFormat::Text);
        assert!(!cli.in_memory);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "events",
            "list-all-events",
            "--limit",
            "20",
            "--output",
            "json",
            "--in-memory",
        ])
        .unwrap();

        assert_eq!(cli.output, OutputFormat::Json);
        assert!(cli.in_memory);
        assert_eq!(
            cli.command,
            Command::ListAllEvents {
                page: PageArgs { skip: 0, limit: 20 }
            }
        );
    }

    #[test]
    fn test_limit_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["events", "list-running-events", "--limit", "0"]).is_err());
        assert!(Cli::try_parse_from(["events", "list-running-events", "--limit", "101"]).is_err());
    }

    #[test]
    fn test_search_requires_tags() {
        assert!(Cli::try_parse_from(["events", "search-event"]).is_err());

        let cli = Cli::try_parse_from(["events", "search-event", "--tags", "a,b"]).unwrap();
        let Command::SearchEvent { tags, page } = cli.command else {
            panic!("expected search-event");
        };
        assert_eq!(tags, vec!["a", "b"]);
        assert_eq!(page.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_delete_event_flags() {
        let cli = Cli::try_parse_from([
            "events",
            "delete-event",
            "--event-id",
            "6631c5d82fda6e60f14e2a3a",
            "--force-delete",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::DeleteEvent {
                event_id: "6631c5d82fda6e60f14e2a3a".into(),
                force_delete: true,
            }
        );
    }
}
