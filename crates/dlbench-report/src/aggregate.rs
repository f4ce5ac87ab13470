use dlbench_trial::TrialSample;
use serde::Serialize;

/// One row of a target's ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub name: String,
    /// +inf when no run succeeded; serialized as `null`.
    pub mean_secs: f64,
    pub throughput_mib_s: f64,
    /// Percentage of the fastest row; `None` when the fastest row is 0.
    pub relative_pct: Option<f64>,
    pub failures: u32,
    pub attempts: u32,
}

impl RankedResult {
    pub fn all_failed(&self) -> bool {
        self.attempts > 0 && self.failures == self.attempts
    }
}

/// Arithmetic mean of `durations`, or +inf when there are none.
pub fn mean(durations: &[f64]) -> f64 {
    if durations.is_empty() {
        return f64::INFINITY;
    }
    durations.iter().sum::<f64>() / durations.len() as f64
}

/// MiB/s for a target of `size_mib` fetched in `mean_secs`; 0 when the time is unusable.
pub fn throughput(size_mib: f64, mean_secs: f64) -> f64 {
    if !mean_secs.is_finite() || mean_secs <= 0.0 {
        return 0.0;
    }
    size_mib / mean_secs
}

/// Rank the samples of one target, fastest first.
///
/// The sort is stable, so equal throughputs keep their enumeration order.
/// Configurations that never succeeded stay in the ranking with 0 MiB/s.
pub fn rank<I, S>(size_mib: f64, samples: I) -> Vec<RankedResult>
where
    I: IntoIterator<Item = (S, TrialSample)>,
    S: Into<String>,
{
    let mut rows: Vec<RankedResult> = samples
        .into_iter()
        .map(|(name, sample)| {
            let mean_secs = mean(&sample.durations);
            RankedResult {
                name: name.into(),
                mean_secs,
                throughput_mib_s: throughput(size_mib, mean_secs),
                relative_pct: None,
                failures: sample.failures,
                attempts: sample.attempts(),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.throughput_mib_s.total_cmp(&a.throughput_mib_s));

    let top = rows.first().map_or(0.0, |r| r.throughput_mib_s);
    if top > 0.0 {
        for row in &mut rows {
            row.relative_pct = Some(row.throughput_mib_s / top * 100.0);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[10.0, 12.0, 11.0]), 11.0);
        assert_eq!(mean(&[]), f64::INFINITY);
    }

    #[test]
    fn test_throughput() {
        assert!(close(throughput(1024.0, 11.0), 93.09));
        assert_eq!(throughput(1024.0, f64::INFINITY), 0.0);
        assert_eq!(throughput(0.0, 11.0), 0.0);
    }

    #[test]
    fn test_rank_orders_and_relates() {
        let rows = rank(
            1024.0,
            [
                ("slow", TrialSample::new(vec![22.0], 0)),
                ("fast", TrialSample::new(vec![10.0, 12.0, 11.0], 0)),
            ],
        );

        assert_eq!(rows[0].name, "fast");
        assert!(close(rows[0].throughput_mib_s, 93.09));
        assert!(close(rows[1].throughput_mib_s, 46.55));
        assert!(close(rows[0].relative_pct.unwrap(), 100.0));
        assert!(close(rows[1].relative_pct.unwrap(), 50.0));
    }

    #[test]
    fn test_rank_keeps_failed_configuration() {
        let rows = rank(
            1024.0,
            [
                ("broken", TrialSample::new(vec![], 3)),
                ("ok", TrialSample::new(vec![8.0], 0)),
            ],
        );

        assert_eq!(rows.len(), 2);
        let broken = &rows[1];
        assert_eq!(broken.name, "broken");
        assert_eq!(broken.mean_secs, f64::INFINITY);
        assert_eq!(broken.throughput_mib_s, 0.0);
        assert_eq!(broken.relative_pct, Some(0.0));
        assert!(broken.all_failed());
    }

    #[test]
    fn test_rank_ties_are_stable() {
        let rows = rank(
            100.0,
            [
                ("a", TrialSample::new(vec![5.0], 0)),
                ("b", TrialSample::new(vec![5.0], 0)),
                ("c", TrialSample::new(vec![5.0], 0)),
            ],
        );
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_relative_not_applicable_when_top_is_zero() {
        let rows = rank(
            1024.0,
            [
                ("x", TrialSample::new(vec![], 3)),
                ("y", TrialSample::new(vec![], 3)),
            ],
        );
        assert!(rows.iter().all(|r| r.relative_pct.is_none()));
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["x", "y"]);
    }

    #[test]
    fn test_unknown_size_ranks_at_zero() {
        let rows = rank(0.0, [("x", TrialSample::new(vec![3.0], 0))]);
        assert_eq!(rows[0].throughput_mib_s, 0.0);
        assert_eq!(rows[0].relative_pct, None);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank::<_, String>(1024.0, Vec::new()).is_empty());
    }
}
