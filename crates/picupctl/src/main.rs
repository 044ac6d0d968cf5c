// # picupctl - Picture Uploads Control
//
// Thin integration layer over picup-core. It reads configuration from the
// environment, builds the collaborators, runs one reconciler operation and
// prints the result. No configuration logic lives here.
//
// ## Configuration
//
// ### Store
// - `PICUP_STORE_TYPE`: Type of preference store (file, memory)
// - `PICUP_STORE_PATH`: Path to preferences file (for file store)
//
// ### Accounts
// - `PICUP_ACCOUNTS`: Comma-separated list of attached accounts
// - `PICUP_CURRENT_ACCOUNT`: Active account (defaults to the first)
//
// ### Defaults
// - `PICUP_DEFAULT_REMOTE_PATH`: Remote folder reported when unset
// - `PICUP_DEFAULT_SOURCE_PATH`: Local folder reported when unset
//
// ### Logging
// - `PICUP_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export PICUP_STORE_TYPE=file
// export PICUP_STORE_PATH=/var/lib/picup/preferences.json
// export PICUP_ACCOUNTS=alice@cloud.example.com,bob@cloud.example.com
//
// picupctl enable
// picupctl source-path /sdcard/Pictures
// picupctl status
// ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use picup_core::config::{DEFAULT_REMOTE_PATH, DEFAULT_SOURCE_PATH};
use picup_core::scheduler::DEFAULT_EVENT_CAPACITY;
use picup_core::{
    FolderSelection, PictureUploadsConfig, PictureUploadsReconciler, PreferenceStore,
    PreferenceSyncScheduler, StaticAccountDirectory, StoreConfig, StoreRegistry, UploadBehaviour,
};
use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum PicupExitCode {
    /// Operation completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Operation failed
    RuntimeError = 2,
}

impl From<PicupExitCode> for ExitCode {
    fn from(code: PicupExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Inspect and change picture upload settings
#[derive(Debug, Parser)]
#[command(name = "picupctl", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the current picture upload configuration
    Status,
    /// Turn picture uploads on for the active account
    Enable,
    /// Turn picture uploads off and clear the account and remote folder
    Disable,
    /// List attached accounts
    Accounts,
    /// Show or set the remote upload folder
    RemotePath {
        /// New remote folder; omit to print the current one
        path: Option<String>,
    },
    /// Show or set the local source folder
    SourcePath {
        /// New local folder; omit to print the current one
        path: Option<String>,
    },
    /// Show or set whether uploads wait for Wi-Fi
    WifiOnly {
        /// true or false; omit to print the current value
        value: Option<bool>,
    },
    /// Show or set what happens to local pictures after upload
    Behaviour {
        /// keep or move; omit to print the current value
        value: Option<UploadBehaviour>,
    },
    /// Force a full rescan on the next sync
    ResetSync,
    /// Request the upload job
    Schedule,
    /// Remove settings left by older releases
    PurgeLegacy,
}

/// Application configuration
struct Config {
    store_type: String,
    store_path: Option<String>,
    accounts: Vec<String>,
    current_account: Option<String>,
    default_remote_path: String,
    default_source_path: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self {
            store_type: env::var("PICUP_STORE_TYPE").unwrap_or_else(|_| "file".to_string()),
            store_path: env::var("PICUP_STORE_PATH").ok(),
            accounts: env::var("PICUP_ACCOUNTS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            current_account: env::var("PICUP_CURRENT_ACCOUNT")
                .ok()
                .filter(|s| !s.is_empty()),
            default_remote_path: env::var("PICUP_DEFAULT_REMOTE_PATH")
                .unwrap_or_else(|_| DEFAULT_REMOTE_PATH.to_string()),
            default_source_path: env::var("PICUP_DEFAULT_SOURCE_PATH")
                .unwrap_or_else(|_| DEFAULT_SOURCE_PATH.to_string()),
            log_level: env::var("PICUP_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.store_type.as_str() {
            "file" => {
                if self.store_path.as_ref().is_none_or(|p| p.is_empty()) {
                    anyhow::bail!(
                        "PICUP_STORE_PATH is required when PICUP_STORE_TYPE=file. \
                        Set it via: export PICUP_STORE_PATH=/var/lib/picup/preferences.json"
                    );
                }
            }
            "memory" => {}
            other => anyhow::bail!(
                "PICUP_STORE_TYPE '{}' is not supported. Supported types: file, memory",
                other
            ),
        }

        if let Some(current) = &self.current_account
            && !self.accounts.contains(current)
        {
            anyhow::bail!(
                "PICUP_CURRENT_ACCOUNT '{}' is not listed in PICUP_ACCOUNTS",
                current
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "PICUP_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        self.uploads_config().validate()?;
        Ok(())
    }

    fn store_config(&self) -> StoreConfig {
        match (self.store_type.as_str(), &self.store_path) {
            ("file", Some(path)) => StoreConfig::File { path: path.clone() },
            _ => StoreConfig::Memory,
        }
    }

    fn uploads_config(&self) -> PictureUploadsConfig {
        PictureUploadsConfig::new()
            .with_default_remote_path(self.default_remote_path.clone())
            .with_default_source_path(self.default_source_path.clone())
            .with_store(self.store_config())
    }

    fn log_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {e}");
        return PicupExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return PicupExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return PicupExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config, cli.command).await {
            Ok(()) => PicupExitCode::Success,
            Err(e) => {
                error!("{:#}", e);
                eprintln!("Error: {e:#}");
                PicupExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Build collaborators and run one command
async fn run(config: Config, command: Command) -> Result<()> {
    let uploads_config = config.uploads_config();

    let registry = StoreRegistry::with_builtin();
    let store: Arc<dyn PreferenceStore> =
        Arc::from(registry.create_store(&uploads_config.store).await?);

    let accounts = StaticAccountDirectory::with_accounts(config.accounts.iter().cloned());
    if let Some(current) = &config.current_account {
        accounts.set_current(current).await?;
    }

    let (scheduler, mut scheduler_events) =
        PreferenceSyncScheduler::new(store.clone(), DEFAULT_EVENT_CAPACITY);
    let scheduler = Arc::new(scheduler);

    let reconciler = PictureUploadsReconciler::new(
        store.clone(),
        Arc::new(accounts),
        scheduler.clone(),
        uploads_config,
    )?;

    info!("Running {:?}", command);

    match command {
        Command::Status => {
            let snapshot = reconciler.configuration().await?;
            println!("enabled:      {}", snapshot.enabled);
            println!(
                "account:      {}",
                snapshot.account_name.as_deref().unwrap_or("-")
            );
            println!("remote path:  {}", snapshot.upload_path);
            println!("source path:  {}", snapshot.source_path);
            println!("wifi only:    {}", snapshot.wifi_only);
            println!("after upload: {}", snapshot.behaviour);
            println!("last sync:    {}", scheduler.last_sync_timestamp().await?);
        }
        Command::Enable => {
            reconciler.set_enabled(true).await?;
            match reconciler.bound_account_name().await? {
                Some(name) => println!("Picture uploads enabled for {name}"),
                None => println!("Picture uploads enabled (no account attached)"),
            }
        }
        Command::Disable => {
            reconciler.set_enabled(false).await?;
            println!("Picture uploads disabled");
        }
        Command::Accounts => {
            let bound = reconciler.bound_account_name().await?;
            for name in reconciler.known_account_names().await? {
                let marker = if bound.as_deref() == Some(name.as_str()) { "*" } else { " " };
                println!("{marker} {name}");
            }
        }
        Command::RemotePath { path } => {
            if let Some(path) = path {
                reconciler
                    .apply_selected_remote_path(Some(&FolderSelection::new(path)))
                    .await?;
            }
            println!("{}", reconciler.remote_path().await?);
        }
        Command::SourcePath { path } => {
            if let Some(path) = path {
                reconciler
                    .apply_selected_source_path(Some(&FolderSelection::new(path)))
                    .await?;
            }
            println!("{}", reconciler.source_path().await?);
        }
        Command::WifiOnly { value } => {
            if let Some(value) = value {
                reconciler.set_wifi_only(value).await?;
            }
            println!("{}", reconciler.is_wifi_only().await?);
        }
        Command::Behaviour { value } => {
            if let Some(behaviour) = value {
                reconciler.set_behaviour_after_upload(behaviour).await?;
            }
            println!("{}", reconciler.behaviour_after_upload().await?);
        }
        Command::ResetSync => {
            reconciler.reset_last_sync().await?;
            println!("Last sync reset; next run rescans everything");
        }
        Command::Schedule => {
            reconciler.schedule_sync_job().await?;
            println!("Sync job requested");
        }
        Command::PurgeLegacy => {
            let removed = reconciler.purge_legacy_preferences().await?;
            println!("Removed {removed} legacy setting(s)");
        }
    }

    store.flush().await?;

    // Nothing consumes scheduler events in a one-shot run; log them instead
    drop(reconciler);
    drop(scheduler);
    while let Some(event) = scheduler_events.recv().await {
        debug!("Scheduler event: {:?}", event);
    }

    Ok(())
}
