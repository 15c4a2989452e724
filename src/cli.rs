use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "match-ladder rating server")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the API server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Create the database schema if it does not exist yet
    Init,
    /// Replay match history and compare it with stored ratings
    Recalculate {
        /// Overwrite ratings that disagree with the replay
        #[arg(long)]
        repair: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::parse_from(["match_ladder", "serve", "--port", "8080"]);
        assert_eq!(cli.command, Command::Serve { port: 8080 });

        let cli = Cli::parse_from(["match_ladder", "serve"]);
        assert_eq!(cli.command, Command::Serve { port: 3000 });

        let cli = Cli::parse_from(["match_ladder", "recalculate", "--repair"]);
        assert_eq!(cli.command, Command::Recalculate { repair: true });
    }
}
