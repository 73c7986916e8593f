use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Root directory holding one `GD{n}/` directory per round.
    pub data_dir: PathBuf,
    /// Round identifiers to load, in load order.
    pub rounds: Vec<u32>,
    pub output_path: PathBuf,
    pub log_level: String,
    /// Seed for clustering initialization. Identical input and seed give
    /// identical output.
    pub seed: u64,
    /// K-means restarts per fit; the lowest-inertia restart wins.
    pub n_init: usize,
    /// Iteration cap for a single k-means restart.
    pub max_iter: usize,
}
