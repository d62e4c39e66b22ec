use reqwest::Method;
use tevo_auth::core::config::{ClientConfig, ConfigError};
use tevo_auth::core::kernel::{RequestAuthenticator, RestClient, SIGNATURE_HEADER, TOKEN_HEADER};
use tevo_auth::{OutboundRequest, ReqwestRest};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tevo-sign [--send] <METHOD> <URL|/path> [BODY]

Credentials are read from TEVO_API_TOKEN / TEVO_API_SECRET (a .env file is
honoured). TEVO_SANDBOX=true targets the sandbox API; TEVO_BASE_URL overrides
the base URL used for relative paths.";

#[cfg(feature = "env-file")]
fn load_config() -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_env_file("TEVO")
}

#[cfg(not(feature = "env-file"))]
fn load_config() -> Result<ClientConfig, ConfigError> {
    ClientConfig::from_env("TEVO")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let send = args.iter().any(|arg| arg == "--send");
    let positional: Vec<&str> = args
        .iter()
        .map(String::as_str)
        .filter(|arg| *arg != "--send")
        .collect();

    let (method, target, body) = match positional.as_slice() {
        [method, target] => (*method, *target, None),
        [method, target, body] => (*method, *target, Some(*body)),
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    };

    let config = load_config()?;
    let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
    let url = if target.starts_with('/') {
        format!("{}{}", config.effective_base_url().trim_end_matches('/'), target)
    } else {
        target.to_string()
    };

    let mut request = OutboundRequest::new(method, &url)?;
    if let Some(body) = body {
        request = request.with_body(body.as_bytes().to_vec());
    }

    let authenticator = RequestAuthenticator::new(config.credential())?;
    let result = authenticator.signature(&request)?;
    let signed = authenticator.authenticate(&request)?;

    println!("URL:         {}", signed.url());
    println!("Base string: {}", result.base_string);
    println!("{}: {}", TOKEN_HEADER, signed.header(TOKEN_HEADER).unwrap_or_default());
    println!(
        "{}: {}",
        SIGNATURE_HEADER,
        signed.header(SIGNATURE_HEADER).unwrap_or_default()
    );

    if send {
        let rest = ReqwestRest::from_config(&config)?;
        let response = rest.execute(request).await?;
        println!("Status:      {}", response.status());
        println!("{}", response.text().await?);
    }

    Ok(())
}
