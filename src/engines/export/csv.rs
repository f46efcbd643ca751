use crate::config::{ClubGrip, ExportConfig, FitnessMode, JointExtent, RunConfig};
use crate::engines::generation::genome::{ActuationStep, Encoding, Genome};
use crate::engines::generation::history::FitnessHistory;
use crate::engines::generation::orchestrator::{EncodedRun, RunOutcome};
use crate::error::{Result, SwingEvoError};
use polars::df;
use polars::prelude::*;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written(PathBuf),
    /// A file for this configuration already existed and was left alone.
    Skipped(PathBuf),
}

impl ExportOutcome {
    pub fn path(&self) -> &Path {
        match self {
            ExportOutcome::Written(path) | ExportOutcome::Skipped(path) => path,
        }
    }
}

/// Persists finished runs.
pub trait ResultExporter {
    fn export<S: ActuationStep>(&mut self, outcome: &RunOutcome<S>) -> Result<ExportOutcome>;

    /// One file holding the runs of several encodings side by side.
    fn export_comparison(&mut self, runs: &[EncodedRun]) -> Result<ExportOutcome>;

    fn export_encoded(&mut self, run: &EncodedRun) -> Result<ExportOutcome> {
        match run {
            EncodedRun::TorqueVector(outcome) => self.export(outcome),
            EncodedRun::TimedTorqueBurst(outcome) => self.export(outcome),
            EncodedRun::TimedDurationTorque(outcome) => self.export(outcome),
        }
    }
}

#[derive(Serialize)]
struct BestGenomeReport<'a, S> {
    encoding: Encoding,
    fitness: f64,
    generation: usize,
    agent: usize,
    exported_at: String,
    genome: &'a Genome<S>,
}

/// Writes one row per generation with its best and average fitness.
pub struct CsvExporter {
    output_dir: PathBuf,
    write_best_genome: bool,
}

impl CsvExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            write_best_genome: config.write_best_genome,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Claims `<stem>.csv`, or returns `None` when it already exists.
    fn claim(&self, stem: &str) -> Result<(PathBuf, Option<File>)> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(format!("{}.csv", stem));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => Ok((path, Some(file))),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                log::warn!("Results already exported, skipping {}", path.display());
                Ok((path, None))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_frame(path: &Path, mut file: File, mut df: DataFrame) -> Result<()> {
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        log::info!("Wrote {} generations to {}", df.height(), path.display());
        Ok(())
    }
}

impl ResultExporter for CsvExporter {
    fn export<S: ActuationStep>(&mut self, outcome: &RunOutcome<S>) -> Result<ExportOutcome> {
        let stem = result_file_stem(&outcome.config, Some(S::ENCODING));
        let frame = history_frame(&outcome.history)?;
        let (path, file) = self.claim(&stem)?;
        let Some(file) = file else {
            return Ok(ExportOutcome::Skipped(path));
        };

        Self::write_frame(&path, file, frame)?;

        if self.write_best_genome {
            if let Some(best) = &outcome.best {
                let report = BestGenomeReport {
                    encoding: S::ENCODING,
                    fitness: best.fitness,
                    generation: best.generation,
                    agent: best.agent,
                    exported_at: chrono::Utc::now().to_rfc3339(),
                    genome: &best.genome,
                };
                let json_path = self.output_dir.join(format!("{}.best.json", stem));
                std::fs::write(&json_path, serde_json::to_string_pretty(&report)?)?;
            }
        }

        Ok(ExportOutcome::Written(path))
    }

    fn export_comparison(&mut self, runs: &[EncodedRun]) -> Result<ExportOutcome> {
        let first = runs
            .first()
            .ok_or_else(|| SwingEvoError::Export("no runs to compare".to_string()))?;
        let stem = result_file_stem(first.config(), None);
        let frame = comparison_frame(runs)?;
        let (path, file) = self.claim(&stem)?;
        let Some(file) = file else {
            return Ok(ExportOutcome::Skipped(path));
        };

        Self::write_frame(&path, file, frame)?;
        Ok(ExportOutcome::Written(path))
    }
}

/// Columns `Generation #`, `Best Fitness`, `Average Fitness`, generations numbered from 1.
pub fn history_frame(history: &FitnessHistory) -> Result<DataFrame> {
    let generations: Vec<u32> = (1..=history.rows_written() as u32).collect();
    let df = df!(
        "Generation #" => generations,
        "Best Fitness" => history.best_per_generation(),
        "Average Fitness" => history.mean_per_generation(),
    )?;
    Ok(df)
}

/// Best and average columns for every run, prefixed `Chrom<N>`.
pub fn comparison_frame(runs: &[EncodedRun]) -> Result<DataFrame> {
    let rows = runs.first().map(|r| r.history().rows_written()).unwrap_or(0);
    if runs.iter().any(|r| r.history().rows_written() != rows) {
        return Err(SwingEvoError::Export(
            "compared runs have different generation counts".to_string(),
        ));
    }

    let generations: Vec<u32> = (1..=rows as u32).collect();
    let mut columns = vec![Column::new("Generation #".into(), generations)];
    for run in runs {
        let id = run.encoding().id();
        columns.push(Column::new(
            format!("Chrom{} Best Fitness", id).into(),
            run.history().best_per_generation(),
        ));
        columns.push(Column::new(
            format!("Chrom{} Average Fitness", id).into(),
            run.history().mean_per_generation(),
        ));
    }

    Ok(DataFrame::new(columns)?)
}

/// File name (without extension) identifying a configuration. Hole settings
/// only appear in accuracy mode; `encoding` adds the `_chrom-N` suffix.
pub fn result_file_stem(config: &RunConfig, encoding: Option<Encoding>) -> String {
    let evolution = &config.evolution;
    let swing = &config.swing;

    let mut name = format!("numGens-{}", evolution.num_generations);
    name += match swing.fitness_mode {
        FitnessMode::Accuracy => "_fitness-accuracy",
        FitnessMode::DriveDistance => "_fitness-distance",
    };
    name += match swing.joint_extent {
        JointExtent::ArmsTorso => "_jointsExtent-upperBody",
        JointExtent::FullBody => "_jointsExtent-fullBody",
    };
    name += match swing.grip {
        ClubGrip::OneHand => "_grip-1hand",
        ClubGrip::TwoHands => "_grip-2hand",
    };
    name += &format!("_numAgents-{}", evolution.population_size);
    if swing.fitness_mode == FitnessMode::Accuracy {
        name += &format!("_holeDist-{}", swing.hole_distance);
        name += &format!("_holeRandOffset-{}", swing.hole_jitter);
    }
    name += &format!("_genTime-{}", swing.generation_time_secs);
    name += &format!("_pc-{}", evolution.crossover_rate);
    name += &format!("_mc-{}", evolution.mutation_rate);
    name += &format!("_elitism-{}", evolution.elitism_count);
    if let Some(encoding) = encoding {
        name += &format!("_chrom-{}", encoding.id());
    }
    name
}
