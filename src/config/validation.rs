use super::{AppConfig, MAX_AUTOSAVE_SECS, MAX_CHORD_WINDOW_MS, MIN_CHORD_WINDOW_MS};
use crate::form::FormSpec;
use anyhow::{bail, Context, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize paths.
    pub fn validate(&mut self) -> Result<()> {
        if !(MIN_CHORD_WINDOW_MS..=MAX_CHORD_WINDOW_MS).contains(&self.chord_window_ms) {
            bail!(
                "--chord-window-ms must be between {MIN_CHORD_WINDOW_MS} and {MAX_CHORD_WINDOW_MS}, got {}",
                self.chord_window_ms
            );
        }

        if self.autosave_secs > MAX_AUTOSAVE_SECS {
            bail!(
                "--autosave-secs must be between 0 and {MAX_AUTOSAVE_SECS}, got {}",
                self.autosave_secs
            );
        }

        if let Some(path) = &mut self.form_spec {
            if !path.is_file() {
                bail!("form spec '{}' does not exist", path.display());
            }
            *path = path
                .canonicalize()
                .with_context(|| format!("failed to canonicalize form spec '{}'", path.display()))?;
            // Fail at startup rather than the first time the form opens.
            FormSpec::from_path(path)?;
        }

        Ok(())
    }

    /// Form definition from `--form-spec`, or the built-in one.
    pub fn load_form_spec(&self) -> Result<FormSpec> {
        match &self.form_spec {
            Some(path) => FormSpec::from_path(path),
            None => Ok(FormSpec::default()),
        }
    }
}
