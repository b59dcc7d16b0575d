//! Tuning and diagnostics settings for an [`EdgeProcessor`](crate::EdgeProcessor).

/// Settings for one edge processor.
///
/// Everything here has a sensible default; nothing is read from the
/// environment.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// How chatty the processor is. Diagnostic messages of level `n` are
    /// logged when `verbosity >= base_verbosity + n`.
    pub verbosity: i32,
    /// Offset added to every diagnostic level.
    pub base_verbosity: i32,
    /// Runs of crossing edges shorter than this are not cached by the sweep.
    ///
    /// Zero turns the cache off.
    pub skip_threshold: usize,
    /// How much an intersection band grows before it is processed, as a
    /// factor of the number of edges alive at its start.
    pub band_growth: f64,
    /// The progress collaborator is asked for cancellation once per this
    /// many bands or scanlines.
    pub progress_interval: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            verbosity: 0,
            base_verbosity: 0,
            skip_threshold: 2,
            band_growth: 1.5,
            progress_interval: 64,
        }
    }
}

impl Config {
    /// Should diagnostics of the given level be produced?
    pub fn reports(&self, level: i32) -> bool {
        self.verbosity >= self.base_verbosity + level
    }

    /// Returns this config with the skip cache disabled.
    pub fn without_skip_cache(mut self) -> Self {
        self.skip_threshold = 0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        let mut config = Config::default();
        assert!(!config.reports(1));
        config.verbosity = 11;
        config.base_verbosity = 10;
        assert!(config.reports(1));
        assert!(!config.reports(2));
    }

    #[test]
    fn partial_deserialize() {
        let config: Config = serde_json::from_str(r#"{ "skip_threshold": 0 }"#).unwrap();
        assert_eq!(config.skip_threshold, 0);
        assert_eq!(config.band_growth, 1.5);
    }
}
