use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if no engine is configured or a limit is out of range
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_has_engines()?;
        self.validate_limits()?;
        self.validate_timeouts()?;
        Ok(())
    }

    /// Ensure at least one engine is configured
    fn validate_has_engines(&self) -> anyhow::Result<()> {
        if self.textgen.is_none() && self.stt.is_none() && self.tts.is_none() {
            anyhow::bail!("at least one engine must be configured (textgen, stt, or tts)");
        }

        Ok(())
    }

    fn validate_limits(&self) -> anyhow::Result<()> {
        if self.server.max_upload_size == 0 {
            anyhow::bail!("server.max_upload_size must be greater than 0");
        }

        if let Some(ref textgen) = self.textgen
            && textgen.max_length == 0
        {
            anyhow::bail!("textgen.max_length must be greater than 0");
        }

        if let Some(ref telemetry) = self.telemetry
            && let Some(ref tracing) = telemetry.tracing
            && !(0.0..=1.0).contains(&tracing.sampling_rate)
        {
            anyhow::bail!("telemetry.tracing.sampling_rate must be between 0.0 and 1.0");
        }

        Ok(())
    }

    fn validate_timeouts(&self) -> anyhow::Result<()> {
        let timeouts = [
            ("textgen", self.textgen.as_ref().map(|c| c.timeout)),
            ("stt", self.stt.as_ref().map(|c| c.timeout)),
            ("tts", self.tts.as_ref().map(|c| c.timeout)),
        ];

        for (section, timeout) in timeouts {
            if timeout.is_some_and(|t| t.is_zero()) {
                anyhow::bail!("{section}.timeout must be greater than 0");
            }
        }

        Ok(())
    }
}
