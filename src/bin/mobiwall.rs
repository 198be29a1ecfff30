//! CLI for Mobiwall - phone wallpapers via Google Imagen.

use clap::{Args, Parser, Subcommand};
use mobiwall::{
    ClientConfig, CredentialStore, FileCredentialStore, GenerationClient, ResolvedCredential,
    SettingsFlow, TestStatus, WallpaperService, WallpaperSession,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mobiwall")]
#[command(about = "Generate vertical phone wallpapers with Google Imagen")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding the stored API key (defaults to the user config dir)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true, hide = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate four 9:16 wallpapers from a text prompt
    Generate(GenerateArgs),

    /// Manage the stored API key
    #[command(subcommand)]
    Key(KeyCommand),

    /// Check that the service accepts the active (or given) key
    Test {
        /// Key to test instead of the active one (not saved)
        #[arg(long)]
        key: Option<String>,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// The text prompt describing the wallpaper
    prompt: String,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    output: PathBuf,
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Test a key and save it if the service accepts it
    Set {
        /// The Google AI Studio API key
        key: String,
    },
    /// Delete the stored key
    Clear,
    /// Show the active key (masked) and where it comes from
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (store, client) = open_client(&cli)?;

    match cli.command {
        Commands::Generate(args) => generate(client, args, cli.json).await?,
        Commands::Key(KeyCommand::Set { key }) => set_key(client, store, &key, cli.json).await?,
        Commands::Key(KeyCommand::Clear) => clear_key(client, store, cli.json)?,
        Commands::Key(KeyCommand::Show) => show_key(&client, cli.json)?,
        Commands::Test { key } => test_connection(&client, key.as_deref(), cli.json).await?,
    }

    Ok(())
}

fn open_client(
    cli: &Cli,
) -> anyhow::Result<(Arc<dyn CredentialStore>, Arc<GenerationClient>)> {
    let store: Arc<dyn CredentialStore> = match &cli.config_dir {
        Some(dir) => Arc::new(FileCredentialStore::in_dir(dir)),
        None => Arc::new(FileCredentialStore::default_location()?),
    };

    let mut builder = GenerationClient::builder()
        .store(Arc::clone(&store))
        .config(ClientConfig::from_env());
    if let Some(url) = &cli.base_url {
        builder = builder.base_url(url.as_str());
    }
    Ok((store, Arc::new(builder.build()?)))
}

async fn generate(
    client: Arc<GenerationClient>,
    args: GenerateArgs,
    json_output: bool,
) -> anyhow::Result<()> {
    let mut session = WallpaperSession::new(client);
    if !session.submit(&args.prompt).await {
        anyhow::bail!("Prompt must not be empty");
    }
    if let Some(error) = &session.state().error {
        anyhow::bail!("{}", error);
    }

    std::fs::create_dir_all(&args.output)?;
    let mut saved = Vec::new();
    for image in session.images() {
        let path = args.output.join(format!("{}.jpg", image.id));
        image.save(&path)?;
        saved.push(path);
    }

    if json_output {
        let result = serde_json::json!({
            "type": "wallpapers",
            "success": true,
            "prompt": session.prompt_text(),
            "aspect_ratio": mobiwall::image::WALLPAPER_ASPECT_RATIO,
            "outputs": saved.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Generated {} wallpapers for \"{}\":",
            saved.len(),
            session.prompt_text()
        );
        for path in &saved {
            println!("  {}", path.display());
        }
    }

    Ok(())
}

async fn set_key(
    client: Arc<GenerationClient>,
    store: Arc<dyn CredentialStore>,
    key: &str,
    json_output: bool,
) -> anyhow::Result<()> {
    let mut flow = SettingsFlow::new(client, store);
    let status = flow.save_and_test(key).await;
    let saved = status == TestStatus::Success;

    if json_output {
        let result = serde_json::json!({ "type": "key", "action": "set", "success": saved });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if saved {
        println!("Connected. API key saved.");
    }

    if !saved {
        anyhow::bail!("Connection failed. Check your API key; it was not saved.");
    }
    Ok(())
}

fn clear_key(
    client: Arc<GenerationClient>,
    store: Arc<dyn CredentialStore>,
    json_output: bool,
) -> anyhow::Result<()> {
    let mut flow = SettingsFlow::new(client, store);
    flow.clear_key()?;

    if json_output {
        let result = serde_json::json!({ "type": "key", "action": "clear", "success": true });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Stored API key removed.");
    }
    Ok(())
}

fn show_key(client: &GenerationClient, json_output: bool) -> anyhow::Result<()> {
    let active = client.active_credential(None);

    if json_output {
        let result = key_report(active.as_ref());
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match active {
            Some(credential) => println!("{} ({})", credential.masked(), credential.source()),
            None => println!("{}", mobiwall::CONFIGURATION_MESSAGE),
        }
    }
    Ok(())
}

fn key_report(active: Option<&ResolvedCredential>) -> serde_json::Value {
    serde_json::json!({
        "type": "key",
        "configured": active.is_some(),
        "source": active.map(|c| c.source().to_string()),
        "masked": active.map(|c| c.masked()),
    })
}

async fn test_connection(
    client: &GenerationClient,
    key: Option<&str>,
    json_output: bool,
) -> anyhow::Result<()> {
    let connected = client.validate_connection(key).await;

    if json_output {
        let result = serde_json::json!({ "type": "test", "connected": connected });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if connected {
        println!("Connected.");
    }

    if !connected {
        anyhow::bail!("Connection failed. Check your API key.");
    }
    Ok(())
}
