use reqwest::{Client, Url};
use salesforce_oauth_client::{ClientConfig, SalesforceClient, TokenResponse};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

const REDIRECT_URI: &str = "http://localhost:8114/callback";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let client_id = args.next().expect("client_id as first argument");
    let client_secret = args.next().expect("client_secret as second argument");
    let api_version = args.next().unwrap_or_else(|| "v59.0".to_string());

    let config = ClientConfig::new(client_id, client_secret, api_version)?;
    let client = SalesforceClient::new(config, Client::new());

    // The connected app must list REDIRECT_URI as its callback URL.
    let csrf_state = format!("{:x}", std::process::id());
    let authorize_url = client.authorization_url(&csrf_state, REDIRECT_URI);
    println!("Open this URL in your browser:\n{authorize_url}\n");

    // A very naive implementation of the redirect server.
    let listener = TcpListener::bind("127.0.0.1:8114").await?;
    let (stream, _) = listener.accept().await?;
    let mut stream = BufReader::new(stream);

    let mut request_line = String::new();
    stream.read_line(&mut request_line).await?;
    let callback_path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let url = Url::parse(&format!("http://localhost{callback_path}"))?;

    let find = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };
    let code = find("code").expect("callback without a code");
    let state = find("state").unwrap_or_default();

    let message = "Go back to your terminal :)";
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-length: {}\r\n\r\n{}",
        message.len(),
        message
    );
    stream.write_all(response.as_bytes()).await?;

    println!("Salesforce returned the state {state} (expected `{csrf_state}`)\n");

    let result = client.exchange_code(&code, REDIRECT_URI).await?;
    if !result.is_success() {
        eprintln!("token request rejected: {:?}", result.provider_errors());
        return Ok(());
    }
    let token: TokenResponse = result.decode()?;
    println!("salesforce token: {token:?}\n");

    let identity = client.identity(token.access_token(), token.id()).await?;
    println!("identity: {}", identity.body());

    let contacts = client
        .query(
            "SELECT Id, Name FROM Contact LIMIT 5",
            token.instance_url(),
            token.access_token(),
        )
        .await?;
    println!("contacts: {}", contacts.body());
    Ok(())
}
