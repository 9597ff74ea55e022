use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator CLI for the JSON-RPC gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "https://localhost:8443")]
    url: String,

    /// Accept self-signed gateway certificates.
    #[arg(short, long)]
    insecure: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show per-method call counts
    Metrics,
    /// Send one JSON-RPC request through the gateway
    Call {
        /// Method name, e.g. eth_blockNumber
        method: String,
        /// Params as a JSON value
        #[arg(default_value = "[]")]
        params: String,
        /// Request id
        #[arg(long, default_value_t = 1)]
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .danger_accept_invalid_certs(cli.insecure)
        .build()?;
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Metrics => {
            let res = client.get(format!("{}/metrics", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Call { method, params, id } => {
            let params: Value = serde_json::from_str(&params)?;
            let request = json!({
                "jsonrpc": "2.0",
                "method": method,
                "params": params,
                "id": id,
            });
            let res = client
                .post(format!("{}/rpc", base))
                .json(&request)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
