// Placeholder-rate check over the shipped art folders.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::debug;

/// Files smaller than this are placeholders.
pub const PLACEHOLDER_BYTES: u64 = 5 * 1024;
pub const WARN_RATE: f64 = 0.05;
pub const FAIL_RATE: f64 = 0.20;

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Folders checked, relative to the images root.
pub const CHECKED_DIRS: [(&str, &str); 3] = [
    ("Cards", "cards"),
    ("Enemies", "enemies"),
    ("Relics", "relics"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirScan {
    pub total: usize,
    pub placeholders: usize,
}

impl DirScan {
    fn add(&mut self, other: DirScan) {
        self.total += other.total;
        self.placeholders += other.placeholders;
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Count images under `dir`, recursively. Missing or unreadable folders count as empty.
pub fn scan_dir(dir: &Path) -> DirScan {
    let mut scan = DirScan::default();
    let Ok(entries) = fs::read_dir(dir) else {
        return scan;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            scan.add(scan_dir(&path));
        } else if file_type.is_file() && is_image(&path) {
            scan.total += 1;
            match entry.metadata() {
                Ok(meta) if meta.len() < PLACEHOLDER_BYTES => scan.placeholders += 1,
                Ok(_) => {}
                Err(err) => debug!("cannot stat {}: {err}", path.display()),
            }
        }
    }
    scan
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

impl Verdict {
    pub fn from_rate(rate: f64) -> Self {
        if rate > FAIL_RATE {
            Verdict::Fail
        } else if rate > WARN_RATE {
            Verdict::Warn
        } else {
            Verdict::Pass
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Warn => "WARN (>5% placeholders)",
            Verdict::Fail => "FAIL",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub dirs: Vec<(&'static str, DirScan)>,
}

impl ValidationReport {
    pub fn totals(&self) -> DirScan {
        let mut all = DirScan::default();
        for (_, scan) in &self.dirs {
            all.add(*scan);
        }
        all
    }

    /// Placeholder share of all images; 0 when there are none.
    pub fn placeholder_rate(&self) -> f64 {
        let all = self.totals();
        if all.total == 0 {
            0.0
        } else {
            all.placeholders as f64 / all.total as f64
        }
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_rate(self.placeholder_rate())
    }

    pub fn render(&self) -> String {
        let width = self.dirs.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 2;
        let mut out = String::from("\nAsset Validation Report\n========================\n");
        for (label, scan) in &self.dirs {
            let _ = writeln!(
                out,
                "{:<width$}{} images found, {} placeholders (<5KB)",
                format!("{label}:"),
                scan.total,
                scan.placeholders
            );
        }
        let all = self.totals();
        let _ = writeln!(
            out,
            "\n{:<width$}{}/{} real assets ({:.1}% placeholder rate)",
            "Overall:",
            all.total - all.placeholders,
            all.total,
            self.placeholder_rate() * 100.0
        );
        let _ = writeln!(out, "{:<width$}{}", "Status:", self.verdict().label());
        out
    }
}

pub fn validate(images_root: &Path) -> ValidationReport {
    ValidationReport {
        dirs: CHECKED_DIRS
            .iter()
            .map(|(label, dir)| (*label, scan_dir(&images_root.join(dir))))
            .collect(),
    }
}
