//! Classify a selector path for the cursor hover probe.

use folio_input_model::element::ElementTree;
use folio_motion_core::hover;

pub fn run(path: &str) -> anyhow::Result<()> {
    let (tree, leaf) = ElementTree::from_path(path)
        .ok_or_else(|| anyhow::anyhow!("Cannot parse selector path: {path}"))?;

    let interactive = hover::is_interactive(&tree, leaf)?;
    let after_leave = hover::is_interactive_after_leave(&tree, leaf)?;

    println!("Path: {path}");
    println!("  Elements: {}", tree.len());
    println!(
        "  Cursor on enter: {}",
        if interactive { "hover" } else { "default" }
    );
    println!(
        "  Cursor on leave: {}",
        if after_leave { "hover" } else { "default" }
    );

    Ok(())
}
