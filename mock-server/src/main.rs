use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(mock_server::DEFAULT_PORT);
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    println!("mock verification API on http://{}", listener.local_addr()?);
    mock_server::run(listener).await
}
