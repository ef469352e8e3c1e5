#[tokio::main]
async fn main() -> anyhow::Result<()> {
    university::start_server().await
}
