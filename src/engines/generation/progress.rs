use crate::engines::evaluation::EvaluationWarning;

/// Per-generation numbers reported once its evaluation finished.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub generation: usize,
    pub total_generations: usize,
    pub perturbation: f64,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    pub best_ever: f64,
    pub warnings: usize,
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize, total: usize);
    fn on_evaluation_warning(&mut self, warning: &EvaluationWarning);
    fn on_generation_complete(&mut self, summary: &GenerationSummary);
}

impl ProgressCallback for () {
    fn on_generation_start(&mut self, _generation: usize, _total: usize) {}
    fn on_evaluation_warning(&mut self, _warning: &EvaluationWarning) {}
    fn on_generation_complete(&mut self, _summary: &GenerationSummary) {}
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize, total: usize) {
        (**self).on_generation_start(generation, total)
    }

    fn on_evaluation_warning(&mut self, warning: &EvaluationWarning) {
        (**self).on_evaluation_warning(warning)
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        (**self).on_generation_complete(summary)
    }
}

/// Reports progress through the `log` facade.
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, generation: usize, total: usize) {
        log::info!("Generation {}/{} starting...", generation + 1, total);
    }

    fn on_evaluation_warning(&mut self, warning: &EvaluationWarning) {
        log::warn!("Swing failed: {}", warning);
    }

    fn on_generation_complete(&mut self, summary: &GenerationSummary) {
        log::info!(
            "Generation {}/{} complete. Best: {:.4}, Mean: {:.4}, Best ever: {:.4}, Hole offset: {:.2}, Failed swings: {}",
            summary.generation + 1,
            summary.total_generations,
            summary.best_fitness,
            summary.mean_fitness,
            summary.best_ever,
            summary.perturbation,
            summary.warnings
        );
    }
}
