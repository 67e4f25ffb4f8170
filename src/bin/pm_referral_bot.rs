use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pm_referral_bot::auth::token_manager::TokenManager;
use pm_referral_bot::auth::token_store::{self, SecretKind};
use pm_referral_bot::clock::SystemClock;
use pm_referral_bot::config::{Config, load_config};
use pm_referral_bot::daemon::PollLoop;
use pm_referral_bot::reddit::RedditClient;
use pm_referral_bot::responder::classify::{Route, classify_subject};
use pm_referral_bot::responder::compose::compose;
use pm_referral_bot::responder::referral::CandidateSelector;

#[derive(Parser)]
#[command(name = "pm_referral_bot")]
#[command(about = "Answers reddit inbox messages with Public Mobile referral contacts", long_about = None)]
struct Cli {
    /// Config file (defaults to the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Poll the inbox and reply, forever unless --cycles is given
    Run {
        #[arg(long)]
        cycles: Option<u64>,
    },

    /// Run a single poll cycle without the trailing sleep
    Once,

    /// Print the reply a subject would get, without sending anything
    Preview {
        #[arg(long)]
        subject: String,

        #[arg(long, default_value = "someone")]
        user: String,
    },

    /// Store a secret in the OS keyring (read from stdin)
    SetSecret {
        #[arg(long, value_enum)]
        kind: SecretKind,

        /// Client id for client secrets, username for passwords
        #[arg(long)]
        key: String,
    },
}

fn connect(cfg: &Config) -> Result<RedditClient> {
    let user_agent = cfg.user_agent();
    let tokens = TokenManager::new(cfg.credentials()?, &user_agent)?;
    Ok(RedditClient::new(tokens, &user_agent)?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let load = || {
        load_config(cli.config.as_deref()).map_err(|e| anyhow!("Configuration error: {e:#}"))
    };

    match cli.cmd {
        Command::SetSecret { kind, key } => {
            eprintln!("Paste secret (end with Ctrl-D):");
            let mut secret = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut secret)?;
            token_store::save_secret(kind, &key, secret.trim())?;
            println!("Saved {kind:?} for {key}");
            Ok(())
        }

        Command::Run { cycles } => {
            let cfg = load()?;
            let settings = cfg.settings()?;
            let reddit = connect(&cfg)?;
            log::info!("Logged in as u/{}", reddit.username());

            PollLoop::new(&reddit, &SystemClock, &settings).run(cycles);
            Ok(())
        }

        Command::Once => {
            let cfg = load()?;
            let settings = cfg.settings()?;
            let reddit = connect(&cfg)?;

            let report = PollLoop::new(&reddit, &SystemClock, &settings).run_cycle()?;
            println!("{report:?}");
            Ok(())
        }

        Command::Preview { subject, user } => {
            let cfg = load()?;
            let settings = cfg.settings()?;
            let route = classify_subject(&subject, &settings);

            let candidate = if route == Route::Referral {
                let reddit = connect(&cfg)?;
                let selector =
                    CandidateSelector::new(&settings.referral_subreddit, &settings.referral_page);
                Some(selector.select(&reddit)?)
            } else {
                None
            };

            println!("route: {route:?}");
            match compose(&route, &user, candidate.as_deref(), &settings) {
                Some(text) => println!("{text}"),
                None => println!("(no reply)"),
            }
            Ok(())
        }
    }
}
