use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("arch-check") => arch_check(),
        Some(cmd) => anyhow::bail!("Unknown xtask command: {cmd}"),
        None => anyhow::bail!("Usage: cargo xtask <command>\n\nCommands:\n  arch-check"),
    }
}

/// Dependencies each workspace crate must not take.
const FORBIDDEN_DEPS: &[(&str, &[&str])] = &[
    (
        "skillquest-domain",
        &[
            "skillquest-engine",
            "skillquest-shared",
            "tokio",
            "reqwest",
            "async-trait",
            "tracing",
        ],
    ),
    (
        "skillquest-shared",
        &["skillquest-engine", "skillquest-domain", "tokio", "reqwest"],
    ),
];

/// I/O the pure domain crate must not perform, even through a transitive dependency.
const DOMAIN_IO_PATTERN: &str = r"\b(tokio|reqwest)::|\bstd::(fs|net|process)\b";

#[derive(Debug, Deserialize)]
struct Metadata {
    packages: Vec<Package>,
}

#[derive(Debug, Deserialize)]
struct Package {
    name: String,
    manifest_path: PathBuf,
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    name: String,
    #[serde(default)]
    kind: Option<String>,
}

fn arch_check() -> anyhow::Result<()> {
    let output = std::process::Command::new("cargo")
        .args(["metadata", "--format-version", "1", "--no-deps"])
        .output()
        .context("running cargo metadata")?;

    if !output.status.success() {
        anyhow::bail!("cargo metadata failed")
    }

    let metadata: Metadata =
        serde_json::from_slice(&output.stdout).context("parsing cargo metadata")?;

    let mut violations = dependency_violations(&metadata);

    if let Some(domain) = metadata
        .packages
        .iter()
        .find(|package| package.name == "skillquest-domain")
    {
        let src = domain
            .manifest_path
            .parent()
            .map(|dir| dir.join("src"))
            .context("domain manifest has no parent directory")?;
        violations.extend(scan_domain_sources(&src)?);
    }

    if violations.is_empty() {
        println!("arch-check: ok ({} crates)", metadata.packages.len());
        return Ok(());
    }

    for violation in &violations {
        eprintln!("arch-check: {violation}");
    }
    anyhow::bail!("{} architecture violation(s)", violations.len())
}

fn dependency_violations(metadata: &Metadata) -> Vec<String> {
    let mut violations = Vec::new();
    for package in &metadata.packages {
        let Some((_, forbidden)) = FORBIDDEN_DEPS
            .iter()
            .find(|(name, _)| *name == package.name)
        else {
            continue;
        };

        for dep in &package.dependencies {
            // Dev-dependencies only affect tests.
            if dep.kind.as_deref() == Some("dev") {
                continue;
            }
            if forbidden.contains(&dep.name.as_str()) {
                violations.push(format!("{} must not depend on {}", package.name, dep.name));
            }
        }
    }
    violations
}

fn scan_domain_sources(dir: &Path) -> anyhow::Result<Vec<String>> {
    let pattern = regex_lite::Regex::new(DOMAIN_IO_PATTERN).context("compiling I/O pattern")?;
    let mut violations = Vec::new();

    for path in rust_files(dir)? {
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        violations.extend(io_violations(&pattern, &path, &contents));
    }
    Ok(violations)
}

fn io_violations(pattern: &regex_lite::Regex, path: &Path, contents: &str) -> Vec<String> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .filter_map(|(index, line)| {
            pattern.find(line).map(|found| {
                format!(
                    "{}:{}: domain code uses {}",
                    path.display(),
                    index + 1,
                    found.as_str()
                )
            })
        })
        .collect()
}

fn rust_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current)
            .with_context(|| format!("listing {}", current.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}
