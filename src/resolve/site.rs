//! Site override discovery

use crate::config::load_config;
use crate::error::{ResolveError, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find the subdirectory of `directory` that belongs to `site`.
///
/// Subdirectories are visited in file-name order. An exact name match wins;
/// otherwise the first directory whose name contains `site` is used.
pub fn find_site_dir(directory: &Path, site: &str) -> Result<Option<PathBuf>> {
    let mut substring_match = None;

    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(ResolveError::SiteDirectory {
                    site: site.to_string(),
                    directory: directory.to_path_buf(),
                    source: e,
                });
            }
            Err(e) => {
                tracing::debug!("Skipping unreadable entry in {}: {}", directory.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name == site {
            return Ok(Some(entry.into_path()));
        }
        if substring_match.is_none() && name.contains(site) {
            substring_match = Some(entry.into_path());
        }
    }

    Ok(substring_match)
}

/// Load `file` from the site subdirectory of `directory`.
///
/// An absolute `file` is looked up by its file name only. Every failure here
/// is non-fatal for the caller, which records it as a warning and carries on
/// with the base config.
pub fn load_site_override(
    directory: &Path,
    site: &str,
    file: &Path,
) -> Result<(PathBuf, Map<String, Value>)> {
    let not_found = || ResolveError::SiteOverrideNotFound {
        site: site.to_string(),
        directory: directory.to_path_buf(),
    };

    let site_dir = find_site_dir(directory, site)?.ok_or_else(not_found)?;
    let path = site_dir.join(site_relative(file).ok_or_else(not_found)?);
    if !path.is_file() {
        return Err(not_found());
    }

    match load_config(&path) {
        Ok(config) => Ok((path, config)),
        Err(e) => Err(ResolveError::SiteOverrideParse {
            site: site.to_string(),
            path,
            source: Box::new(e),
        }),
    }
}

fn site_relative(file: &Path) -> Option<&Path> {
    if file.is_absolute() {
        file.file_name().map(Path::new)
    } else {
        Some(file)
    }
}
