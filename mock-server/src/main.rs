use tokio::net::TcpListener;

/// Standalone echo server for poking at the facade by hand, e.g.
/// `curl -d k=v localhost:3000/echo`.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let listener = TcpListener::bind(format!("{host}:{port}")).await?;
    let addr = listener.local_addr()?;
    println!("echo server on http://{addr} (routes: /echo, /status/{{code}}, /delay/{{ms}}, /redirect)");
    mock_server::run(listener).await
}
