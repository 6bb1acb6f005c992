//! Beam search execution engine.
//!
//! # Algorithm
//!
//! 1. Build the candidate pool from the attribute domains
//! 2. Start with `beam_width` empty rules scored 0.0
//! 3. For each sweep, starting the next beam as a copy of the current one:
//!    a. For each rule in the current beam, visit the pool in a fresh random order
//!    b. Skip extensions that constrain an attribute twice or that are
//!       already in the next beam
//!    c. Score the extension's subgroup; if it beats the weakest member of
//!       the next beam, replace that member and re-sort ascending
//! 4. Stop when a sweep leaves the set of rules unchanged, or after `max_iter` sweeps

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::BeamConfig;
use super::pool::candidate_pool;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::preference::{QualityMeasure, ScoringContext};
use crate::rule::{Condition, Rule};

/// Result of a beam search run.
#[derive(Debug, Clone)]
pub struct BeamResult {
    /// Final beam in ascending score order; the last rule is the best.
    pub beam: Vec<Rule>,

    /// Number of sweeps executed.
    pub iterations: usize,

    /// Whether the search stopped because a sweep changed nothing.
    pub converged: bool,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Number of candidate subgroups scored.
    pub evaluations: usize,

    /// Best score in the beam after each sweep.
    pub score_history: Vec<f64>,
}

impl BeamResult {
    /// Canonical strings of the final beam, in beam order.
    pub fn keys(&self) -> Vec<String> {
        self.beam.iter().map(Rule::key).collect()
    }

    /// The highest-scoring rule.
    pub fn best(&self) -> Option<&Rule> {
        self.beam.last()
    }

    /// The `n` best rules, best first.
    pub fn top(&self, n: usize) -> impl Iterator<Item = &Rule> + '_ {
        self.beam.iter().rev().take(n)
    }
}

/// Beam search runner.
pub struct BeamRunner;

impl BeamRunner {
    /// Runs the beam search with an RNG seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration, and aborts if a condition cannot
    /// be resolved against the dataset.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_subgroup::beam::{BeamConfig, BeamRunner};
    /// use u_subgroup::dataset::Dataset;
    /// use u_subgroup::preference::PmScore;
    ///
    /// let data = Dataset::new(
    ///     &["group"],
    ///     &[vec!["0"], vec!["0"], vec!["0"], vec!["1"]],
    ///     &["a", "b"],
    ///     &[vec![1, 2], vec![1, 2], vec![1, 2], vec![2, 1]],
    /// )
    /// .unwrap();
    /// let config = BeamConfig::default().with_beam_width(2).with_seed(1);
    /// let result = BeamRunner::run(&data, &PmScore::default(), &config).unwrap();
    /// assert_eq!(result.best().unwrap().key(), "[group = 1]");
    /// ```
    pub fn run<M>(dataset: &Dataset, measure: &M, config: &BeamConfig) -> Result<BeamResult>
    where
        M: QualityMeasure + ?Sized,
    {
        Self::run_with_cancel(dataset, measure, config, None)
    }

    /// Runs the beam search with an optional cancellation token.
    ///
    /// The flag is checked before each sweep; a cancelled run returns the
    /// beam as of the last completed sweep.
    pub fn run_with_cancel<M>(
        dataset: &Dataset,
        measure: &M,
        config: &BeamConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<BeamResult>
    where
        M: QualityMeasure + ?Sized,
    {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        search(dataset, measure, config, &mut rng, cancel.as_deref())
    }

    /// Runs the beam search drawing the exploration order from `rng`.
    ///
    /// `config.seed` is ignored.
    pub fn run_with_rng<M, R>(
        dataset: &Dataset,
        measure: &M,
        config: &BeamConfig,
        rng: &mut R,
    ) -> Result<BeamResult>
    where
        M: QualityMeasure + ?Sized,
        R: Rng + ?Sized,
    {
        search(dataset, measure, config, rng, None)
    }
}

fn search<M, R>(
    dataset: &Dataset,
    measure: &M,
    config: &BeamConfig,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<BeamResult>
where
    M: QualityMeasure + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;

    let context = ScoringContext::from_population(dataset.ranks())?;
    let pool = candidate_pool(dataset);
    debug!(
        conditions = pool.len(),
        subjects = dataset.n_subjects(),
        items = dataset.n_items(),
        "candidate pool built"
    );

    let mut beam = Beam::empty(config.beam_width);
    let mut next = beam.clone();
    let mut iterations = 0;
    let mut evaluations = 0;
    let mut converged = false;
    let mut cancelled = false;
    let mut score_history = Vec::with_capacity(config.max_iter);

    while iterations < config.max_iter {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            cancelled = true;
            break;
        }

        for (_, parent) in &beam.slots {
            let candidates = extensions(parent, &pool, &mut *rng);
            evaluations += sweep_parent(dataset, measure, &context, candidates, &mut next, config)?;
        }

        iterations += 1;
        score_history.push(next.best_score());

        if next.sorted_keys() == beam.sorted_keys() {
            converged = true;
            break;
        }
        beam = next.clone();

        debug!(
            iteration = iterations,
            best = next.best_score(),
            beam = ?beam.keys(),
            "sweep finished"
        );
    }

    info!(
        iterations,
        evaluations,
        converged,
        best = next.best_score(),
        "beam search finished"
    );

    Ok(BeamResult {
        beam: next.into_rules(),
        iterations,
        converged,
        cancelled,
        evaluations,
        score_history,
    })
}

/// One-condition extensions of `parent`, in a freshly shuffled pool order.
fn extensions<R: Rng + ?Sized>(parent: &Rule, pool: &[Condition], rng: &mut R) -> Vec<Rule> {
    let mut order: Vec<&Condition> = pool.iter().collect();
    order.shuffle(rng);
    order
        .into_iter()
        .filter_map(|c| parent.extended(c))
        .collect()
}

/// Offers every candidate of one parent to the next beam, in order.
///
/// Returns the number of candidates offered, not counting duplicates of
/// rules already in the next beam. The parallel path scores duplicates too
/// but reports the same count as the serial one.
fn sweep_parent<M>(
    dataset: &Dataset,
    measure: &M,
    context: &ScoringContext,
    candidates: Vec<Rule>,
    next: &mut Beam,
    config: &BeamConfig,
) -> Result<usize>
where
    M: QualityMeasure + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        if config.parallel {
            let scores = candidates
                .par_iter()
                .map(|c| evaluate(c, dataset, measure, context))
                .collect::<Result<Vec<_>>>()?;
            let mut scored = 0;
            for (candidate, score) in candidates.into_iter().zip(scores) {
                let key = candidate.key();
                if next.contains(&key) {
                    continue;
                }
                scored += 1;
                if let Some(score) = score {
                    offer(next, key, candidate, score, config.verbose);
                }
            }
            return Ok(scored);
        }
    }

    let mut scored = 0;
    for candidate in candidates {
        let key = candidate.key();
        if next.contains(&key) {
            continue;
        }
        scored += 1;
        if let Some(score) = evaluate(&candidate, dataset, measure, context)? {
            offer(next, key, candidate, score, config.verbose);
        }
    }
    Ok(scored)
}

/// Scores one candidate.
///
/// Resolution failures propagate, since they affect every candidate alike.
/// A failing or non-finite measure only drops this candidate.
fn evaluate<M>(
    candidate: &Rule,
    dataset: &Dataset,
    measure: &M,
    context: &ScoringContext,
) -> Result<Option<f64>>
where
    M: QualityMeasure + ?Sized,
{
    let subset = candidate.get_subset(dataset)?;
    match measure.score(&subset, context) {
        Ok(score) if score.is_finite() => Ok(Some(score)),
        Ok(score) => {
            warn!(rule = %candidate, score, "non-finite score, candidate skipped");
            Ok(None)
        }
        Err(err) => {
            warn!(rule = %candidate, error = %err, "scoring failed, candidate skipped");
            Ok(None)
        }
    }
}

fn offer(next: &mut Beam, key: String, candidate: Rule, score: f64, verbose: bool) {
    if verbose {
        info!(rule = %key, score, "candidate evaluated");
    }
    if next.admit(key, candidate, score) && verbose {
        info!(beam = ?next.keys(), "beam updated");
    }
}

/// Fixed-width beam sorted ascending by score, each rule stored with its key.
#[derive(Debug, Clone)]
struct Beam {
    slots: Vec<(String, Rule)>,
}

impl Beam {
    fn empty(width: usize) -> Self {
        Self {
            slots: vec![(String::new(), Rule::new()); width],
        }
    }

    fn contains(&self, key: &str) -> bool {
        self.slots.iter().any(|(k, _)| k == key)
    }

    /// Replaces the weakest rule if `score` is strictly higher.
    fn admit(&mut self, key: String, mut rule: Rule, score: f64) -> bool {
        if score <= self.slots[0].1.score {
            return false;
        }
        rule.score = score;
        self.slots[0] = (key, rule);
        self.slots.sort_by(|a, b| a.1.score.total_cmp(&b.1.score));
        true
    }

    fn best_score(&self) -> f64 {
        self.slots.last().map_or(0.0, |(_, r)| r.score)
    }

    fn keys(&self) -> Vec<&str> {
        self.slots.iter().map(|(k, _)| k.as_str()).collect()
    }

    fn sorted_keys(&self) -> Vec<&str> {
        let mut keys = self.keys();
        keys.sort_unstable();
        keys
    }

    fn into_rules(self) -> Vec<Rule> {
        self.slots.into_iter().map(|(_, r)| r).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::RankMatrix;
    use crate::error::SubgroupError;
    use crate::preference::{PmScore, ScoreFn};

    /// Subjects in group "0" always prefer item a; everyone else prefers c.
    fn polarized() -> Dataset {
        let attrs = [
            vec!["0", "x"],
            vec!["0", "y"],
            vec!["1", "x"],
            vec!["1", "y"],
            vec!["2", "x"],
            vec!["2", "y"],
            vec!["3", "x"],
            vec!["3", "y"],
        ];
        let ranks: Vec<Vec<u32>> = attrs
            .iter()
            .map(|row| {
                if row[0] == "0" {
                    vec![1, 2, 3]
                } else {
                    vec![3, 2, 1]
                }
            })
            .collect();
        Dataset::new(&["group", "side"], &attrs, &["a", "b", "c"], &ranks).unwrap()
    }

    fn config() -> BeamConfig {
        BeamConfig::default()
            .with_beam_width(3)
            .with_max_iter(10)
            .with_seed(42)
    }

    #[test]
    fn test_finds_polarized_group() {
        let data = polarized();
        let result = BeamRunner::run(&data, &PmScore::default(), &config()).unwrap();
        let best = result.best().unwrap();
        assert_eq!(best.key(), "[group = 0]");
        assert!(best.score > 0.0);
        assert!(result.converged);
    }

    #[test]
    fn test_beam_sorted_ascending() {
        let data = polarized();
        let result = BeamRunner::run(&data, &PmScore::default(), &config()).unwrap();
        assert_eq!(result.beam.len(), 3);
        for w in result.beam.windows(2) {
            assert!(w[0].score <= w[1].score);
        }
    }

    #[test]
    fn test_score_history_non_decreasing() {
        let data = polarized();
        let result = BeamRunner::run(&data, &PmScore::default(), &config()).unwrap();
        assert_eq!(result.score_history.len(), result.iterations);
        for w in result.score_history.windows(2) {
            assert!(w[1] >= w[0], "best score dropped: {} -> {}", w[0], w[1]);
        }
    }

    #[test]
    fn test_no_duplicate_rules() {
        let data = polarized();
        let result = BeamRunner::run(&data, &PmScore::default(), &config()).unwrap();
        let mut keys: Vec<String> = result.keys().into_iter().filter(|k| !k.is_empty()).collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), before);
    }

    #[test]
    fn test_same_seed_same_result() {
        let data = polarized();
        let a = BeamRunner::run(&data, &PmScore::default(), &config()).unwrap();
        let b = BeamRunner::run(&data, &PmScore::default(), &config()).unwrap();
        assert_eq!(a.keys(), b.keys());
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_run_with_rng() {
        let data = polarized();
        let mut rng = StdRng::seed_from_u64(3);
        let result =
            BeamRunner::run_with_rng(&data, &PmScore::default(), &config(), &mut rng).unwrap();
        assert_eq!(result.best().unwrap().key(), "[group = 0]");
    }

    #[test]
    fn test_max_iter_bounds_sweeps() {
        let data = polarized();
        let config = config().with_max_iter(1);
        let result = BeamRunner::run(&data, &PmScore::default(), &config).unwrap();
        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
    }

    #[test]
    fn test_cancellation() {
        let data = polarized();
        let cancel = Arc::new(AtomicBool::new(true));
        let result =
            BeamRunner::run_with_cancel(&data, &PmScore::default(), &config(), Some(cancel))
                .unwrap();
        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert!(result.beam.iter().all(Rule::is_empty));
    }

    #[test]
    fn test_zero_scores_never_admitted() {
        let data = polarized();
        let measure = ScoreFn(|_: &RankMatrix| 0.0);
        let result = BeamRunner::run(&data, &measure, &config()).unwrap();
        assert!(result.beam.iter().all(Rule::is_empty));
        assert!(result.converged);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_non_finite_scores_skipped() {
        let data = polarized();
        let measure = ScoreFn(|r: &RankMatrix| {
            if r.n_rows() == 2 {
                f64::NAN
            } else {
                r.n_rows() as f64
            }
        });
        let result = BeamRunner::run(&data, &measure, &config()).unwrap();
        assert!(result.beam.iter().all(|r| r.score.is_finite()));
    }

    #[test]
    fn test_invalid_config() {
        let data = polarized();
        let err = BeamRunner::run(&data, &PmScore::default(), &config().with_beam_width(0))
            .unwrap_err();
        assert!(matches!(err, SubgroupError::InvalidConfig { .. }));
    }

    /// Forty subjects over three attributes so that sweeps see plenty of
    /// duplicate extensions.
    fn survey() -> Dataset {
        let attrs: Vec<Vec<String>> = (0..40u32)
            .map(|i| vec![(i % 5).to_string(), (i % 3).to_string(), (i % 4).to_string()])
            .collect();
        let ranks: Vec<Vec<u32>> = (0..40u32)
            .map(|i| match (i % 5 + i % 3) % 4 {
                0 => vec![1, 2, 3, 4],
                1 => vec![4, 3, 2, 1],
                2 => vec![2, 1, 4, 3],
                _ => vec![3, 4, 1, 2],
            })
            .collect();
        let names: Vec<String> = ["age", "region", "income"].map(String::from).to_vec();
        let items: Vec<String> = ["a", "b", "c", "d"].map(String::from).to_vec();
        Dataset::new(&names, &attrs, &items, &ranks).unwrap()
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let data = survey();
        let config = BeamConfig::default()
            .with_beam_width(3)
            .with_max_iter(10)
            .with_seed(17);
        let serial =
            BeamRunner::run(&data, &PmScore::default(), &config.clone().with_parallel(false))
                .unwrap();
        let parallel =
            BeamRunner::run(&data, &PmScore::default(), &config.with_parallel(true)).unwrap();

        assert_eq!(serial.keys(), parallel.keys());
        assert_eq!(serial.iterations, parallel.iterations);
        assert_eq!(serial.evaluations, parallel.evaluations);
        assert_eq!(serial.score_history, parallel.score_history);
        assert_eq!(serial.converged, parallel.converged);
    }

    #[test]
    fn test_duplicates_not_counted() {
        let data = survey();
        let config = BeamConfig::default()
            .with_beam_width(3)
            .with_max_iter(10)
            .with_seed(17)
            .with_parallel(false);
        let result = BeamRunner::run(&data, &PmScore::default(), &config).unwrap();

        // the pool is rebuilt per parent, so every parent could offer it in full
        let pool = candidate_pool(&data).len();
        assert!(result.evaluations > 0);
        assert!(result.evaluations <= pool * config.beam_width * result.iterations);
    }

    /// Collects formatted events in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured_run(config: &BeamConfig) -> (BeamResult, String) {
        let sink = Captured::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let data = polarized();
        let result = tracing::subscriber::with_default(subscriber, || {
            BeamRunner::run(&data, &PmScore::default(), config).unwrap()
        });
        let log = String::from_utf8(sink.0.lock().unwrap().clone()).unwrap();
        (result, log)
    }

    #[test]
    fn test_verbose_run() {
        let (quiet, quiet_log) = captured_run(&config());
        let (loud, loud_log) = captured_run(&config().with_verbose(true));

        assert!(!quiet_log.contains("candidate evaluated"));
        assert!(quiet_log.contains("beam search finished"));
        assert!(loud_log.contains("candidate evaluated"));
        assert!(loud_log.contains("beam updated"));
        assert!(loud_log.contains("[group = 0]"));
        assert_eq!(quiet.keys(), loud.keys());
        assert_eq!(quiet.evaluations, loud.evaluations);
    }

    #[test]
    fn test_beam_admission_is_strict() {
        let mut beam = Beam::empty(2);
        assert!(!beam.admit("[a = 1]".into(), Rule::new(), 0.0));
        assert!(beam.admit("[a = 1]".into(), Rule::new(), 1.0));
        assert!(beam.admit("[a = 2]".into(), Rule::new(), 2.0));
        // ties with the weakest member do not replace it
        assert!(!beam.admit("[a = 3]".into(), Rule::new(), 1.0));
        assert_eq!(beam.keys(), vec!["[a = 1]", "[a = 2]"]);
    }
}
