#[tokio::main]
async fn main() {
    samurai_backend::run().await;
}
