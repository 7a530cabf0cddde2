/// Sample report generator.
///
/// Writes a random spend report in the format the analyser reads
/// (`civ,developer_id,date,spend`). Useful for trying the tool without real
/// data. Generation runs on a background thread and reports once through a
/// crossbeam channel.
use crossbeam_channel::Receiver;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::thread;
use tracing::{info, warn};

/// Default number of rows in a generated report.
pub const DEFAULT_GENERATOR_ROWS: usize = 10_000;

/// Civilisations that appear in generated reports.
pub const CIVILISATIONS: [&str; 4] = ["humans", "blobs", "monsters", "aliens"];

/// Reasons generation can fail.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("cannot write {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("cannot flush {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to start generator worker: {0}")]
    Spawn(#[source] std::io::Error),
}

/// What to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub rows: usize,
    /// Fixed seed for reproducible output; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            rows: DEFAULT_GENERATOR_ROWS,
            seed: None,
        }
    }
}

/// Write a report to `path`. Returns the number of data rows written.
pub fn generate_report(path: &Path, options: &GeneratorOptions) -> Result<usize, GeneratorError> {
    let csv_err = |source| GeneratorError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer
        .write_record(["civ", "developer_id", "date", "spend"])
        .map_err(csv_err)?;

    for _ in 0..options.rows {
        let civ = CIVILISATIONS[rng.gen_range(0..CIVILISATIONS.len())];
        let developer = format!("dev-{:04}", rng.gen_range(0..1_000u32));
        let day = rng.gen_range(0..365u32).to_string();
        let spend = rng.gen_range(1..=1_000u32).to_string();
        writer
            .write_record([civ, developer.as_str(), day.as_str(), spend.as_str()])
            .map_err(csv_err)?;
    }

    writer.flush().map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(options.rows)
}

/// Handle to a generation running on a background thread.
pub struct GenerateHandle {
    /// Receives exactly one message: the written path or a display message.
    pub result_rx: Receiver<Result<PathBuf, String>>,
}

/// Start writing a report to `path` on a background thread.
pub fn start_generate(path: PathBuf, options: GeneratorOptions) -> GenerateHandle {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let fallback_tx = tx.clone();

    let spawned = thread::Builder::new()
        .name("csvsleuth-generator".into())
        .spawn(move || {
            info!("Generating {} rows into {}", options.rows, path.display());
            let outcome = match generate_report(&path, &options) {
                Ok(_) => Ok(path),
                Err(e) => {
                    warn!("Report generation failed: {e}");
                    Err(e.to_string())
                }
            };
            let _ = tx.send(outcome);
        });

    if let Err(e) = spawned {
        let _ = fallback_tx.send(Err(GeneratorError::Spawn(e).to_string()));
    }
    GenerateHandle { result_rx: rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyse_file;
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn generated_report_is_analysable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sample.csv");
        let options = GeneratorOptions {
            rows: 500,
            seed: Some(7),
        };
        assert_eq!(generate_report(&path, &options).unwrap(), 500);

        let cancel = AtomicBool::new(false);
        let h = analyse_file(&path, 0, &cancel, |_| {}).unwrap().unwrap();
        assert_eq!(h.rows_affected, 500);
        assert!(CIVILISATIONS.contains(&h.big_spent_civ.as_str()));
        assert!(h.total_spend_galactic >= 500.0);
    }

    #[test]
    fn same_seed_same_output() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.csv");
        let b = tmp.path().join("b.csv");
        let options = GeneratorOptions {
            rows: 50,
            seed: Some(42),
        };
        generate_report(&a, &options).unwrap();
        generate_report(&b, &options).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn background_generation_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bg.csv");
        let handle = start_generate(
            path.clone(),
            GeneratorOptions {
                rows: 10,
                seed: Some(1),
            },
        );
        let result = handle
            .result_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("generator must report");
        assert_eq!(result, Ok(path.clone()));
        assert!(path.exists());
    }

    #[test]
    fn unwritable_path_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing-dir").join("x.csv");
        let result = generate_report(&path, &GeneratorOptions::default());
        assert!(matches!(result, Err(GeneratorError::Csv { .. })));
    }
}
