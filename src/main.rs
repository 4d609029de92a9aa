//! # Social Auth Gate 命令行
//!
//! 校验一个认证头：退出码 0 表示通过，1 表示凭据被拒绝，2 表示服务商或配置故障

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use social_auth_gate::{
    AuthError, AuthorizationService, Result,
    config::{self, AppConfig},
    error::ErrorCategory,
    lerror, linfo,
    logging::{self, LogComponent, LogStage},
};

#[derive(Parser)]
#[command(
    name = "social-auth-gate",
    about = "Verify third-party identity credentials against their identity provider",
    version
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Configuration file, defaults to config/config.{RUST_ENV}.toml
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Verify an authorization header
    Verify {
        /// Header value, e.g. "Facebook 123|token" or "Twitter 789|token|secret"
        #[arg(long)]
        header: String,

        /// Require the verified user ID to equal this value
        #[arg(long, value_name = "USER_ID")]
        required_user: Option<String>,
    },

    /// Load and validate the configuration, then exit
    CheckConfig,

    /// Show logging environment variables
    LoggingHelp,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error [{}]: {e}", e.error_code());
            exit_code_for(&e)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if matches!(cli.command, Command::LoggingHelp) {
        logging::print_logging_help();
        return Ok(());
    }

    let config = load(cli.config.as_ref())?;

    match cli.command {
        Command::Verify {
            header,
            required_user,
        } => {
            let service = AuthorizationService::from_config(&config).await?;
            let result = service
                .authorize(Some(&header), required_user.as_deref())
                .await?;
            println!("verified {} user {}", result.provider, result.user_id);
            Ok(())
        }
        Command::CheckConfig => {
            linfo!(
                "system",
                LogStage::Configuration,
                LogComponent::Main,
                "config_ok",
                "配置校验通过"
            );
            println!(
                "configuration ok: services {:?}, cache {:?}",
                config.auth.supported_services, config.cache.cache_type
            );
            Ok(())
        }
        Command::LoggingHelp => Ok(()),
    }
}

fn load(path: Option<&PathBuf>) -> Result<AppConfig> {
    match path {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
}

fn exit_code_for(error: &AuthError) -> ExitCode {
    match error.category() {
        ErrorCategory::Client => ExitCode::from(1),
        ErrorCategory::Server => {
            lerror!(
                "system",
                LogStage::Response,
                LogComponent::Main,
                "verify_failed",
                "Verification could not be completed",
                error_code = error.error_code(),
                error = %error
            );
            ExitCode::from(2)
        }
    }
}
