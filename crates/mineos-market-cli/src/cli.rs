//! CLI argument definitions for the `market` binary.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `statistics` | Store-wide counters |
//! | `publications` | List publications with filters |
//! | `publication` | Show one publication |
//! | `download` | Record a download of a publication |
//! | `delete` | Delete one of your publications |
//! | `reviews` | List reviews of a publication |
//! | `review` | Post a review |
//! | `vote` | Vote on a review |
//! | `dialogs` | List your conversations |
//! | `messages` | Show messages exchanged with a user |
//! | `send-message` | Send a private message |
//! | `login` | Log in and print the session credentials |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--host` | env / built-in | Market API base URL |
//! | `--proxy` | none | Proxy prefix for every request |
//! | `--token` | none | Session token for authenticated commands |
//! | `--no-validate` | `false` | Skip response schema validation |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! market statistics --pretty
//! market publications --category wallpapers --order-by popularity --direction desc
//! market --token "$TOKEN" dialogs
//! ```

use clap::{Args, Parser, Subcommand};
use mineos_market_core::{OrderBy, OrderDirection, PublicationCategory, PublicationLanguage};

/// MineOS Market client
///
/// Browse publications, reviews and messages of the MineOS App Market.
/// Results are printed as JSON on stdout.
#[derive(Debug, Parser)]
#[command(name = "market", author, version, about = "MineOS Market client")]
pub struct Cli {
    /// Market API base URL (overrides MINEOS_MARKET_HOST_URL).
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Proxy prefix; the encoded request URL is appended to it.
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    /// Session token used by authenticated commands.
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Skip schema validation of response payloads.
    #[arg(long, global = true, default_value_t = false)]
    pub no_validate: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store-wide counters.
    Statistics,

    /// List publications.
    ///
    ///   market publications --category applications --count 20
    ///   market publications --search paint --order-by rating --direction desc
    Publications(PublicationsArgs),

    /// Show full details of a publication.
    Publication(PublicationArgs),

    /// Record a download of a publication (requires --token).
    Download(FileIdArgs),

    /// Delete one of your publications (requires --token).
    Delete(FileIdArgs),

    /// List reviews of a publication.
    Reviews(ReviewsArgs),

    /// Post a review of a publication (requires --token).
    Review(ReviewArgs),

    /// Vote on whether a review was helpful (requires --token).
    Vote(VoteArgs),

    /// List your conversations (requires --token).
    Dialogs,

    /// Show messages exchanged with a user (requires --token).
    Messages(MessagesArgs),

    /// Send a private message (requires --token).
    SendMessage(SendMessageArgs),

    /// Log in and print the session credentials.
    Login(LoginArgs),
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Statistics => "statistics",
            Self::Publications(_) => "publications",
            Self::Publication(_) => "publication",
            Self::Download(_) => "download",
            Self::Delete(_) => "delete",
            Self::Reviews(_) => "reviews",
            Self::Review(_) => "review",
            Self::Vote(_) => "vote",
            Self::Dialogs => "dialogs",
            Self::Messages(_) => "messages",
            Self::SendMessage(_) => "send-message",
            Self::Login(_) => "login",
        }
    }
}

#[derive(Debug, Args)]
pub struct PublicationsArgs {
    /// Category name or id (applications, libraries, scripts, wallpapers).
    #[arg(long)]
    pub category: Option<PublicationCategory>,

    #[arg(long)]
    pub order_by: Option<OrderBy>,

    /// Sort direction, used together with --order-by.
    #[arg(long, default_value = "desc")]
    pub direction: OrderDirection,

    #[arg(long)]
    pub offset: Option<u64>,

    #[arg(long)]
    pub count: Option<u64>,

    #[arg(long)]
    pub search: Option<String>,

    /// Only publications of this author.
    #[arg(long)]
    pub user: Option<String>,

    /// Restrict to these file ids.
    #[arg(long = "file-id")]
    pub file_ids: Vec<u64>,
}

#[derive(Debug, Args)]
pub struct PublicationArgs {
    pub file_id: u64,

    /// Description language (english, russian or a numeric id).
    #[arg(long)]
    pub language: Option<PublicationLanguage>,
}

#[derive(Debug, Args)]
pub struct FileIdArgs {
    pub file_id: u64,
}

#[derive(Debug, Args)]
pub struct ReviewsArgs {
    pub file_id: u64,

    #[arg(long, default_value_t = 0)]
    pub offset: u64,

    #[arg(long, default_value_t = 10)]
    pub count: u64,
}

#[derive(Debug, Args)]
pub struct ReviewArgs {
    pub file_id: u64,

    /// Rating from 1 to 5.
    #[arg(long)]
    pub rating: u8,

    #[arg(long)]
    pub comment: String,
}

#[derive(Debug, Args)]
pub struct VoteArgs {
    pub review_id: u64,

    /// Mark the review as not helpful.
    #[arg(long, default_value_t = false)]
    pub unhelpful: bool,
}

#[derive(Debug, Args)]
pub struct MessagesArgs {
    pub user_name: String,
}

#[derive(Debug, Args)]
pub struct SendMessageArgs {
    pub user_name: String,
    pub text: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long, conflicts_with = "email", required_unless_present = "email")]
    pub user: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_publication_filters() {
        let cli = Cli::try_parse_from([
            "market",
            "publications",
            "--category",
            "wallpapers",
            "--order-by",
            "rating",
            "--file-id",
            "3",
            "--file-id",
            "9",
        ])
        .expect("valid arguments");

        let Command::Publications(args) = cli.command else {
            panic!("expected publications command");
        };
        assert_eq!(args.category, Some(PublicationCategory::Wallpapers));
        assert_eq!(args.order_by, Some(OrderBy::Rating));
        assert_eq!(args.direction, OrderDirection::Descending);
        assert_eq!(args.file_ids, vec![3, 9]);
    }

    #[test]
    fn command_names_match_subcommands() {
        let command = Cli::command();
        for subcommand in command.get_subcommands().filter(|sub| sub.get_name() != "help") {
            let mut argv = vec!["market", subcommand.get_name()];
            argv.extend(match subcommand.get_name() {
                "publications" | "statistics" | "dialogs" => vec![],
                "messages" => vec!["Ann"],
                "send-message" => vec!["Ann", "hi"],
                "review" => vec!["1", "--rating", "5", "--comment", "ok"],
                "login" => vec!["--user", "bob", "--password", "pw"],
                _ => vec!["1"],
            });

            let cli = Cli::try_parse_from(argv).expect("valid arguments");
            assert_eq!(cli.command.name(), subcommand.get_name());
        }
    }

    #[test]
    fn login_requires_an_identity() {
        assert!(Cli::try_parse_from(["market", "login", "--password", "pw"]).is_err());
        assert!(Cli::try_parse_from([
            "market", "login", "--user", "bob", "--email", "b@x.io", "--password", "pw"
        ])
        .is_err());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli = Cli::try_parse_from(["market", "dialogs", "--token", "abc", "--pretty"])
            .expect("valid arguments");
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert!(cli.pretty);
    }
}
