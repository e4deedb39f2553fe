#[tokio::main]
async fn main() -> std::io::Result<()> {
    pong_server::run_with_config().await
}
