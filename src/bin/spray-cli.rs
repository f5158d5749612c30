use clap::{Parser, Subcommand};
use spray_sdk::{SdkError, SprayClient};

#[derive(Parser)]
#[command(name = "spray-cli")]
#[command(about = "Manage the backends of a running spray proxy", long_about = None)]
struct Cli {
    #[arg(short, long, env = "SPRAYPROXY_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Admin bearer key, when the proxy requires one.
    #[arg(short, long, env = "SPRAYPROXY_ADMIN_API_KEY", hide_env_values = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a backend base URL
    Register { server: String },
    /// Remove a backend base URL
    Unregister { server: String },
    /// Show the registered backends
    List,
    /// Check that the proxy is up
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut client = SprayClient::new(&cli.url);
    if let Some(key) = cli.key {
        client = client.with_api_key(key);
    }

    let result = match cli.command {
        Commands::Register { server } => client.register(&server).await.map(print_list),
        Commands::Unregister { server } => client.unregister(&server).await.map(print_list),
        Commands::List => client.list().await.map(print_list),
        Commands::Health => client.health().await.map(|up| {
            println!("{}", if up { "ok" } else { "unhealthy" });
        }),
    };

    match result {
        Ok(()) => Ok(()),
        Err(SdkError::Status { status, body }) => {
            eprintln!("Error: proxy returned status {}", status);
            eprintln!("Response: {}", body.trim());
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

fn print_list(backends: Vec<String>) {
    if backends.is_empty() {
        println!("(no backends)");
    }
    for backend in backends {
        println!("{}", backend);
    }
}
