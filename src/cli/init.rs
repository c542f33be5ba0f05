//! Init command implementation

use anyhow::Result;
use std::path::Path;

use guru_rewards::RewardConfig;

/// Write the default rewards.toml
pub fn init_command(config_path: &Path, force: bool) -> Result<()> {
    RewardConfig::write_default(config_path, force)?;
    println!("Created {}", config_path.display());
    println!("Edit point values, thresholds and scheduler constants there.");
    Ok(())
}
