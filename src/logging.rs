use anyhow::{Context, Result};
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::{fs::File, path::Path};

/// Route `log` output to `path`; stdout belongs to the screen while the UI runs.
pub(crate) fn init(path: &Path, level: LevelFilter) -> Result<()> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();
    WriteLogger::init(level, config, file).map_err(|e| anyhow::anyhow!("logger setup failed: {e}"))?;
    Ok(())
}
