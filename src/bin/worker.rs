#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = cbt_exam::run_worker().await {
        eprintln!("cbt-exam-worker fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
