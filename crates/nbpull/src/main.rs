//! `nbpull` entrypoint.

#[tokio::main]
async fn main() {
    let exit_code = nbpull::run().await;
    std::process::exit(exit_code);
}
