pub mod generate;
pub mod preview;
pub mod tokens;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tabgen_core::config::{read_config, TabgenConfig};
use tabgen_core::pipeline::{Pipeline, ProgressCallback};
use tabgen_core::{ColumnGenerator, Replacements, TableRegistry};

use crate::args::GenerationOptions;

/// Load the config named by `opts` and run every table through the pipeline.
///
/// Returns the config, the filled registry and the seed that was used.
pub(crate) fn generate_registry(
    opts: &GenerationOptions,
    adjust: impl FnOnce(&mut TabgenConfig),
    progress: Option<ProgressCallback<'_>>,
) -> Result<(TabgenConfig, TableRegistry, u64)> {
    let mut config = read_config(&opts.config)
        .with_context(|| format!("Failed to load {}", opts.config.display()))?;
    adjust(&mut config);

    let seed = opts.resolve_seed(&config);
    let strict = opts.resolve_strict(&config);
    tracing::debug!(seed, strict, "starting generation");

    let replacements = Replacements::with_defaults();
    let generator = ColumnGenerator::new(&replacements).strict(strict);
    let mut registry = TableRegistry::new();
    let mut rng = StdRng::seed_from_u64(seed);

    Pipeline::new(&config, generator)
        .run(&mut registry, &mut rng, progress)
        .context("Generation failed")?;

    Ok((config, registry, seed))
}
