use anyhow::Result;
use comfy_table::Table as ComfyTable;
use rand::rngs::StdRng;
use rand::SeedableRng;

use tabgen_core::Replacements;

use crate::args::TokensArgs;

pub fn run(args: &TokensArgs) -> Result<()> {
    let replacements = Replacements::with_defaults();
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut t = ComfyTable::new();
    t.set_header(vec!["Placeholder", "Kind", "Sample"]);

    let mut shown = 0usize;
    for (token, producer) in replacements.iter() {
        if let Some(ref filter) = args.filter {
            if !token.contains(filter.as_str()) {
                continue;
            }
        }
        let sample = producer(&mut rng);
        t.add_row(vec![token.to_string(), sample.kind().to_string(), sample.to_string()]);
        shown += 1;
    }

    println!("{}", t);
    eprintln!("{} of {} placeholders", shown, replacements.len());
    Ok(())
}
