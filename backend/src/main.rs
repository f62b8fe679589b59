#[tokio::main]
async fn main() -> anyhow::Result<()> {
  pressing_lib::run().await
}
