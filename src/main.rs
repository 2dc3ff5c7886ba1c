use acorn_scene::{AcornApp, ShowcaseConfig};
use anyhow::Context;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app = AcornApp::new(ShowcaseConfig::default()).context("failed to create event loop")?;
    app.run().context("acorn scene stopped")?;
    Ok(())
}
