use anyhow::Context;
use ankirus_config::AnkirusConfig;

use crate::cli::GlobalFlags;

pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<AnkirusConfig> {
    load_dotenv()?;
    AnkirusConfig::load(flags.config.as_deref()).context("failed to load ankirus configuration")
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}
