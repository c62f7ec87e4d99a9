use mock_server::Seed;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let email = std::env::var("PETFRIENDS_EMAIL").unwrap_or_else(|_| "user@petfriends.test".to_string());
    let password = std::env::var("PETFRIENDS_PASSWORD").unwrap_or_else(|_| "secret".to_string());

    // A second account owning one pet gives cross-account scenarios a target.
    let seed = Seed::new()
        .with_account(&email, &password)
        .with_account("stranger@petfriends.test", "stranger")
        .with_pet("stranger@petfriends.test", "Шарик", "пёс", "5");

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    mock_server::run(listener, seed).await
}
