use clap::{Args, Parser, Subcommand};

use crate::config::{LogFormat, ServerConfig};
use crate::core::UserProfile;

#[derive(Parser, Debug)]
#[command(
    name = "advisor",
    about = "Rule-based investment allocation advisor (stocks, funds, deposits, gold, crypto, PPF, NPS, SCSS, policies)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server and web UI
    Serve(ServeArgs),
    /// Compute one allocation and print it as JSON
    Recommend(RecommendArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[arg(long, env = "ADVISOR_HOST", default_value = "0.0.0.0")]
    pub host: String,
    #[arg(long, env = "ADVISOR_PORT", default_value_t = 8080)]
    pub port: u16,
    #[arg(
        long,
        env = "ADVISOR_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        help = "Log output format"
    )]
    pub log_format: LogFormat,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            log_format: args.log_format,
        }
    }
}

#[derive(Args, Debug)]
pub struct RecommendArgs {
    #[arg(long, allow_hyphen_values = true)]
    pub age: i64,
    #[arg(long, allow_hyphen_values = true, help = "Annual income")]
    pub income: i64,
    #[arg(long, allow_hyphen_values = true, help = "Current savings")]
    pub savings: i64,
    #[arg(long, help = "low, medium or high; anything else is treated as high")]
    pub risk_tolerance: String,
    #[arg(long, help = "emergency_fund, vacation or new_car")]
    pub short_term_goal: String,
    #[arg(long, help = "retirement, buy_house or children_education")]
    pub long_term_goal: String,
}

impl From<RecommendArgs> for UserProfile {
    fn from(args: RecommendArgs) -> Self {
        UserProfile {
            age: args.age,
            income: args.income,
            savings: args.savings,
            risk_tolerance: args.risk_tolerance.into(),
            short_term_goal: args.short_term_goal.into(),
            long_term_goal: args.long_term_goal.into(),
        }
    }
}
