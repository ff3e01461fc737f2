// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input discovery and output folder creation.

use std::collections::HashMap;
use std::path::Path;

use docbin_core::error::{EnhancerError, Result};
use docbin_core::{FileTask, OperationKind, OutputFormat, is_supported_extension};
use tracing::{debug, instrument};

/// List every supported image directly inside `input_dir`.
///
/// Sub-folders and files with other extensions are skipped. The result is
/// sorted by path and fully materialised before any work is dispatched.
#[instrument(skip_all, fields(input = %input_dir.display(), ?kind))]
pub fn discover(input_dir: &Path, kind: OperationKind) -> Result<Vec<FileTask>> {
    let mut tasks = Vec::new();
    let mut skipped = 0usize;

    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        let supported = path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(is_supported_extension);
        if supported {
            tasks.push(FileTask::new(path, kind));
        } else {
            skipped += 1;
        }
    }

    tasks.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(found = tasks.len(), skipped, "Input folder scanned");
    Ok(tasks)
}

/// Pairs of tasks that would write the same output file name, such as
/// `page.png` and `page.PNG`, or `a.jpg` and `a.png` with a forced format.
/// Each pair names the first claimant and the later task that collides.
pub fn output_collisions(
    tasks: &[FileTask],
    format: Option<OutputFormat>,
) -> Vec<(&FileTask, &FileTask)> {
    let mut claimed: HashMap<String, &FileTask> = HashMap::with_capacity(tasks.len());
    let mut collisions = Vec::new();
    for task in tasks {
        let first = *claimed.entry(task.output_file_name(format)).or_insert(task);
        if !std::ptr::eq(first, task) {
            collisions.push((first, task));
        }
    }
    collisions
}

/// Create `dir` if it does not exist yet. Returns `true` when it was created.
pub fn ensure_output_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    match std::fs::create_dir_all(dir) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists && dir.is_dir() => Ok(false),
        Err(source) => Err(EnhancerError::DirectoryCreate {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_supported_files_are_listed_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PNG", "a.jpg", "c.bmp", "notes.txt", "scan.tiff", "noext"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("folder.jpg")).unwrap();

        let tasks = discover(dir.path(), OperationKind::Grayscale).unwrap();
        let names: Vec<_> = tasks
            .iter()
            .map(|t| t.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.jpg", "b.PNG", "c.bmp"]);
        assert!(tasks.iter().all(|t| t.kind == OperationKind::Grayscale));
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover(&dir.path().join("gone"), OperationKind::AdaptiveThreshold).is_err());
    }

    #[test]
    fn outputs_differing_only_by_extension_collide() {
        let tasks: Vec<_> = ["page.PNG", "page.png", "scan.jpg", "scan.bmp"]
            .into_iter()
            .map(|name| FileTask::new(name, OperationKind::Grayscale))
            .collect();

        let kept = output_collisions(&tasks, None);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].0.path, Path::new("page.PNG"));
        assert_eq!(kept[0].1.path, Path::new("page.png"));

        let forced = output_collisions(&tasks, Some(OutputFormat::Png));
        assert_eq!(forced.len(), 2);
        assert_eq!(forced[1].1.path, Path::new("scan.bmp"));
    }

    #[test]
    fn output_dir_creation_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        assert!(ensure_output_dir(&out).unwrap());
        assert!(!ensure_output_dir(&out).unwrap());
        assert!(out.is_dir());
    }

    #[test]
    fn output_dir_blocked_by_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        std::fs::write(&out, b"in the way").unwrap();
        assert!(matches!(
            ensure_output_dir(&out),
            Err(EnhancerError::DirectoryCreate { .. })
        ));
    }
}
