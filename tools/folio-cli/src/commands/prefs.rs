//! Inspect or change the persisted animation preference.

use std::path::PathBuf;

use folio_preferences::{AnimationPreference, JsonFileStore, PreferenceHandle};

fn open(store: Option<PathBuf>) -> PreferenceHandle<JsonFileStore> {
    let store = match store {
        Some(path) => JsonFileStore::new(path),
        None => JsonFileStore::default_location(),
    };
    PreferenceHandle::load(store, false)
}

fn print(handle: &PreferenceHandle<JsonFileStore>, preference: AnimationPreference) {
    println!("Preference store: {}", handle.store().path().display());
    println!("  Animations enabled: {}", preference.enabled);
    println!("  Reduced motion requested: {}", preference.reduced_motion_requested);
    println!("  Should animate: {}", preference.should_animate());
}

pub fn show(store: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let handle = open(store);
    if json {
        println!("{}", serde_json::to_string_pretty(&handle.snapshot())?);
    } else {
        print(&handle, handle.snapshot());
    }
    Ok(())
}

pub fn toggle(store: Option<PathBuf>) -> anyhow::Result<()> {
    let mut handle = open(store);
    let preference = handle
        .toggle()
        .map_err(|e| anyhow::anyhow!("Failed to save preference: {e}"))?;
    print(&handle, preference);
    Ok(())
}

pub fn set(store: Option<PathBuf>, enabled: bool) -> anyhow::Result<()> {
    let mut handle = open(store);
    let preference = handle
        .set_enabled(enabled)
        .map_err(|e| anyhow::anyhow!("Failed to save preference: {e}"))?;
    print(&handle, preference);
    Ok(())
}
