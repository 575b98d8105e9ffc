pub mod fish;
pub mod tree;

use log::{debug, info};
use std::borrow::Cow;

pub use fish::{FishGenerator, PreambleCommands};
pub use tree::{CommandNode, CommandTree, FlagSet};

/// Narrows `tree` to `subset` (when given and non-empty) and renders the
/// complete script. The filtering happens before any traversal.
pub fn build_script(
    generator: &FishGenerator,
    tree: &CommandTree,
    subset: Option<&[String]>,
    preamble: PreambleCommands,
) -> String {
    let selected = match subset {
        Some(names) if !names.is_empty() => {
            debug!("Restricting completions to: {}", names.join(" "));
            Cow::Owned(tree.filter_subset(names))
        }
        _ => Cow::Borrowed(tree),
    };

    let root_commands = match preamble {
        PreambleCommands::Filtered => selected.top_level_names(),
        PreambleCommands::All => tree.top_level_names(),
    };

    info!(
        "Generating completions for {} commands ({} top-level)",
        selected.root().node_count() - 1,
        selected.top_level_names().len()
    );

    generator.render(&selected, &root_commands)
}
