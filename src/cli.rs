use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Preview the Instagram feed substitution and manage the stored token
#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Preview the portfolio media feed and manage its credential", long_about = None)]
pub struct Cli {
    /// Feed configuration file (TOML). Defaults to <config dir>/folio.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Credential storage file. Defaults to <data dir>/storage.json
    #[arg(long, global = true, value_name = "FILE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one substitution against a fallback markup file and print the result
    Render {
        /// Markup the container starts with
        #[arg(short, long, value_name = "FILE")]
        fallback: Option<PathBuf>,
        /// Address the page was opened with
        #[arg(long, default_value = "https://localhost/")]
        page_url: String,
        /// Token to pass in the page URL, as a visitor would
        #[arg(short, long)]
        token: Option<String>,
        /// Viewport width in CSS pixels
        #[arg(short, long, default_value_t = 1280)]
        width: u32,
    },
    /// Manage the persisted access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Subcommand)]
pub enum TokenAction {
    /// Persist a token for later runs
    Set { token: String },
    /// Print the persisted token
    Show,
    /// Forget the persisted token
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_defaults() {
        let cli = Cli::try_parse_from(["folio", "render"]).unwrap();
        match cli.command {
            Commands::Render { fallback, page_url, token, width } => {
                assert!(fallback.is_none());
                assert_eq!(page_url, "https://localhost/");
                assert!(token.is_none());
                assert_eq!(width, 1280);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["folio", "token", "set", "ABC", "--store", "/tmp/s.json"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s.json")));
        assert!(matches!(cli.command, Commands::Token { action: TokenAction::Set { ref token } } if token == "ABC"));
    }
}
