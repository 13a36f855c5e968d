//! Subcommand handlers

use crate::config::Config;
use crate::{Command, OutputFormat, SchoolAction, TemplateAction, VariantAction};
use anyhow::{bail, Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tailor_core::{build_zip, is_valid_school_name, variant_entries, DiffResult, ExportRoot, Store};
use tracing::{info, warn};

fn open_store(store_override: Option<PathBuf>, config: &Config) -> Result<Store> {
    let path = store_override
        .or_else(|| config.storage.path.clone())
        .or_else(Store::default_path)
        .context("No data directory available; pass --store <PATH>")?;
    Ok(Store::open(&path)?)
}

fn write_diff(result: &DiffResult, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Plain => writeln!(out, "{}", result.render_plain())?,
        OutputFormat::Markup => writeln!(out, "{}", result.render_markup())?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &result.ops)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn require_school(store: &Store, school: &str) -> Result<()> {
    if !store.schools().iter().any(|s| s == school) {
        bail!(
            "Unknown school {:?}; add it with `tailor school add`",
            school
        );
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn run(
    command: Command,
    store_override: Option<PathBuf>,
    config: &Config,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Diff {
            old,
            new,
            format,
            no_refine,
        } => {
            let mut engine = config.engine();
            if no_refine {
                engine = engine.with_char_refinement(false);
            }
            let result = engine
                .diff_files(&old, &new)
                .with_context(|| format!("Failed to diff {} and {}", old.display(), new.display()))?;
            write_diff(&result, format, out)
        }
        Command::Template { action } => {
            let mut store = open_store(store_override, config)?;
            match action {
                TemplateAction::Show => write!(out, "{}", store.template())?,
                TemplateAction::Set { file } => {
                    let text = read_file(&file)?;
                    store.set_template(&text)?;
                    writeln!(out, "Template saved ({} bytes)", text.len())?;
                }
            }
            Ok(())
        }
        Command::School { action } => {
            let mut store = open_store(store_override, config)?;
            match action {
                SchoolAction::List => {
                    for school in store.schools() {
                        writeln!(out, "{}", school)?;
                    }
                }
                SchoolAction::Add { name } => {
                    if store.add_school(&name)? {
                        writeln!(out, "Added {}", name.trim())?;
                    } else {
                        writeln!(out, "Nothing to add")?;
                    }
                }
                SchoolAction::Remove { name } => {
                    if store.remove_school(&name)? {
                        writeln!(out, "Removed {}", name)?;
                    } else {
                        bail!("Unknown school {:?}", name);
                    }
                }
            }
            Ok(())
        }
        Command::Generate {
            school,
            diff,
            format,
        } => {
            let mut store = open_store(store_override, config)?;
            require_school(&store, &school)?;
            let template = store.template();
            if template.is_empty() {
                bail!("No template stored; run `tailor template set <FILE>` first");
            }
            let variant = config
                .generator()
                .generate(&template, &school)
                .with_context(|| format!("Failed to generate variant for {}", school))?;
            store.set_variant(&school, &variant)?;
            info!("Stored variant for {:?}", school);

            if diff {
                write_diff(&config.engine().diff_strings(&template, &variant), format, out)
            } else {
                write!(out, "{}", variant)?;
                Ok(())
            }
        }
        Command::Variant { action } => {
            let mut store = open_store(store_override, config)?;
            match action {
                VariantAction::Show {
                    school,
                    diff,
                    format,
                } => {
                    let Some(variant) = store.variant(&school) else {
                        bail!("No variant stored for {:?}", school);
                    };
                    if diff {
                        let result = config.engine().diff_strings(&store.template(), variant);
                        write_diff(&result, format, out)?;
                    } else {
                        write!(out, "{}", variant)?;
                    }
                }
                VariantAction::Set { school, file } => {
                    require_school(&store, &school)?;
                    let text = read_file(&file)?;
                    store.set_variant(&school, &text)?;
                    writeln!(out, "Variant for {} saved", school)?;
                }
            }
            Ok(())
        }
        Command::Export { dir, school } => {
            let store = open_store(store_override, config)?;
            let root = ExportRoot::open(&dir)?;
            let mut variants = store.variants();
            if let Some(only) = school {
                variants.retain(|name, _| *name == only);
                if variants.is_empty() {
                    bail!("No variant stored for {:?}", only);
                }
            }
            for (name, text) in &variants {
                let path = root.write_variant(name, text)?;
                writeln!(out, "{}", path.display())?;
            }
            Ok(())
        }
        Command::Import { dir } => {
            let mut store = open_store(store_override, config)?;
            let root = ExportRoot::open(&dir)?;
            let imported = root.import_all()?;
            let mut count = 0;
            for (name, text) in &imported {
                let school = name.trim();
                if !is_valid_school_name(school) {
                    warn!("Skipping export folder {:?}", name);
                    continue;
                }
                store.add_school(school)?;
                store.set_variant(school, text)?;
                count += 1;
            }
            writeln!(out, "Imported {} variants", count)?;
            Ok(())
        }
        Command::Zip { out: zip_path } => {
            let store = open_store(store_override, config)?;
            let variants = store.variants();
            if variants.is_empty() {
                bail!("No variants stored");
            }
            let bytes = build_zip(&variant_entries(&variants)?)?;
            std::fs::write(&zip_path, bytes)
                .with_context(|| format!("Failed to write {}", zip_path.display()))?;
            writeln!(
                out,
                "Wrote {} variants to {}",
                variants.len(),
                zip_path.display()
            )?;
            Ok(())
        }
    }
}
