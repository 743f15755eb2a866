//! Statistics / histograms: a pure fold over the completed-job list.
//!
//! No dependency on virtual time or events — this module can (and is)
//! tested without running the kernel at all.

use std::collections::BTreeMap;
use std::fmt;

use jobsim_core::{Configuration, Job};

const DEFAULT_BIN_COUNT: usize = 10;
const BAR_PRINT_MAX: f64 = 20.0;

/// One bin of a [`Histogram`]: an inclusive `[min, max]` range, a total
/// count, and (for stacked histograms) a per-label breakdown.
pub struct HistogramBin {
    pub min: i64,
    pub max: i64,
    pub total_count: usize,
    pub count_by_label: BTreeMap<String, usize>,
    total_points: usize,
    scale: f64,
}

impl HistogramBin {
    fn add(&mut self, label: Option<&str>) {
        self.total_count += 1;
        if let Some(label) = label {
            *self.count_by_label.entry(label.to_string()).or_insert(0) += 1;
        }
    }
}

impl fmt::Display for HistogramBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bar = "█".repeat((self.total_count as f64 * self.scale) as usize);
        let pct = if self.total_points == 0 {
            0.0
        } else {
            self.total_count as f64 / self.total_points as f64 * 100.0
        };
        write!(f, "|{bar} {}-{}: {} ({:.0}%)", self.min, self.max, self.total_count, pct)?;
        if !self.count_by_label.is_empty() {
            for (label, count) in &self.count_by_label {
                write!(f, " ({label} {count})")?;
            }
        }
        Ok(())
    }
}

/// A 10-equal-width-bin histogram over an integer range, optionally
/// stacked by a string label per data point.
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// `None` when `values` is empty (§4.F edge case: skip, don't divide by zero).
    pub fn build(values: &[i64], bin_count: usize) -> Option<Histogram> {
        Self::build_labeled(&values.iter().map(|v| (*v, None)).collect::<Vec<_>>(), bin_count)
    }

    pub fn build_stacked(values: &[(i64, String)], bin_count: usize) -> Option<Histogram> {
        let labeled: Vec<(i64, Option<&str>)> = values.iter().map(|(v, l)| (*v, Some(l.as_str()))).collect();
        Self::build_labeled(&labeled, bin_count)
    }

    fn build_labeled(values: &[(i64, Option<&str>)], bin_count: usize) -> Option<Histogram> {
        if values.is_empty() || bin_count == 0 {
            return None;
        }
        let min = values.iter().map(|(v, _)| *v).min().unwrap();
        let max = values.iter().map(|(v, _)| *v).max().unwrap();
        let bin_width = (max - min) / bin_count as i64 + 1;
        let total_points = values.len();
        let scale = if total_points > 0 { BAR_PRINT_MAX / total_points as f64 } else { 0.0 };

        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                min: min + i as i64 * bin_width,
                max: min + (i as i64 + 1) * bin_width - 1,
                total_count: 0,
                count_by_label: BTreeMap::new(),
                total_points,
                scale,
            })
            .collect();

        for (value, label) in values {
            let mut idx = ((*value - min) / bin_width) as usize;
            if idx >= bins.len() {
                idx = bins.len() - 1;
            }
            bins[idx].add(*label);
        }

        Some(Histogram { bins })
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bin in &self.bins {
            writeln!(f, "{bin}")?;
        }
        Ok(())
    }
}

pub struct JobClassStats {
    pub tag: String,
    pub count: usize,
    pub share: f64,
}

pub struct WaitTimeStats {
    pub min: i64,
    pub mean: f64,
    pub max: i64,
    pub histogram: Histogram,
}

pub struct TierUtilization {
    pub tag: String,
    pub distinct_workers_used: usize,
    pub total_execution_time: i64,
}

/// The full reduction of a completed-job list, computed once at the end
/// of a run. If `completed` is empty this is `None` entirely — an
/// empty result is not an error (§7), it simply has nothing to report.
pub struct Statistics {
    pub total_jobs: usize,
    pub job_class_counts: Vec<JobClassStats>,
    pub submission_histogram: Histogram,
    pub wait_time: WaitTimeStats,
    pub tier_utilization: Vec<TierUtilization>,
    pub worker_start_time_histogram: Histogram,
}

impl Statistics {
    pub fn compute(completed: &[Job], config: &Configuration, bin_count: usize) -> Option<Statistics> {
        if completed.is_empty() {
            return None;
        }
        let total_jobs = completed.len();

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for job in completed {
            *counts.entry(job.job_class.clone()).or_insert(0) += 1;
        }
        let job_class_counts = counts
            .into_iter()
            .map(|(tag, count)| JobClassStats {
                tag,
                count,
                share: count as f64 / total_jobs as f64,
            })
            .collect();

        let submission_values: Vec<(i64, String)> = completed.iter().map(|j| (j.submission_time, j.job_class.clone())).collect();
        let submission_histogram = Histogram::build_stacked(&submission_values, bin_count)
            .expect("non-empty completed list yields a non-empty submission histogram");

        let waits: Vec<i64> = completed.iter().map(|j| j.wait_time()).collect();
        let wait_time = WaitTimeStats {
            min: *waits.iter().min().unwrap(),
            mean: waits.iter().sum::<i64>() as f64 / waits.len() as f64,
            max: *waits.iter().max().unwrap(),
            histogram: Histogram::build(&waits, bin_count).expect("non-empty completed list yields a non-empty wait histogram"),
        };

        let mut tier_utilization = Vec::new();
        for tier in &config.worker_tiers {
            let jobs_in_tier: Vec<&Job> = completed.iter().filter(|j| j.worker_tier.as_deref() == Some(tier.tag.as_str())).collect();
            let distinct_workers_used = jobs_in_tier.iter().filter_map(|j| j.worker_id).collect::<std::collections::BTreeSet<_>>().len();
            let total_execution_time = jobs_in_tier.iter().map(|j| config.execution_duration(&j.job_class)).sum();
            tier_utilization.push(TierUtilization {
                tag: tier.tag.clone(),
                distinct_workers_used,
                total_execution_time,
            });
        }

        let worker_start_values: Vec<(i64, String)> = completed
            .iter()
            .filter_map(|j| {
                let tier = j.worker_tier.as_ref()?;
                let id = j.worker_id?;
                Some((j.start_execution_time, format!("{tier}-{id}")))
            })
            .collect();
        let worker_start_time_histogram =
            Histogram::build_stacked(&worker_start_values, bin_count).expect("non-empty completed list yields a non-empty worker-usage histogram");

        Some(Statistics {
            total_jobs,
            job_class_counts,
            submission_histogram,
            wait_time,
            tier_utilization,
            worker_start_time_histogram,
        })
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Jobs completed: {}", self.total_jobs)?;
        writeln!(f, "\nPer job-class counts:")?;
        for jc in &self.job_class_counts {
            writeln!(f, "  {}: {} ({:.1}%)", jc.tag, jc.count, jc.share * 100.0)?;
        }
        writeln!(f, "\nSubmission-time distribution (stacked by job class):")?;
        write!(f, "{}", self.submission_histogram)?;
        writeln!(f, "\nWait-time distribution: min={} mean={:.1} max={}", self.wait_time.min, self.wait_time.mean, self.wait_time.max)?;
        write!(f, "{}", self.wait_time.histogram)?;
        writeln!(f, "\nWorker utilization per tier:")?;
        for tu in &self.tier_utilization {
            writeln!(f, "  {}: {} workers used, {}s total execution", tu.tag, tu.distinct_workers_used, tu.total_execution_time)?;
        }
        writeln!(f, "\nPer-worker start-time usage:")?;
        write!(f, "{}", self.worker_start_time_histogram)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobsim_core::{JobClass, JobId, UserClass, WorkerId, WorkerTier};

    fn config() -> Configuration {
        Configuration {
            job_classes: vec![
                JobClass {
                    tag: "S".into(),
                    execution_duration: 60,
                    weight: 1,
                },
                JobClass {
                    tag: "M".into(),
                    execution_duration: 240,
                    weight: 1,
                },
            ],
            user_classes: vec![UserClass {
                tag: "C".into(),
                weight: 1,
                max_jobs_per_request: 1,
            }],
            worker_tiers: vec![WorkerTier {
                tag: "H".into(),
                capacity: 2,
                priority: 1,
                startup_latency: 0,
                shutdown_latency: 0,
            }],
            lambda_per_hour: 100,
        }
    }

    fn completed_job(id: u64, class: &str, submission: i64, start: i64, worker: u64) -> Job {
        let mut job = Job::new(JobId::new(id), class, "C", submission);
        job.start_execution_time = start;
        job.worker_tier = Some("H".into());
        job.worker_id = Some(WorkerId::new(worker));
        job
    }

    #[test]
    fn empty_completed_list_yields_no_statistics() {
        assert!(Statistics::compute(&[], &config(), DEFAULT_BIN_COUNT).is_none());
    }

    #[test]
    fn per_class_share_sums_to_one() {
        let jobs = vec![completed_job(0, "S", 0, 0, 0), completed_job(1, "M", 0, 0, 0), completed_job(2, "S", 0, 0, 1)];
        let stats = Statistics::compute(&jobs, &config(), DEFAULT_BIN_COUNT).unwrap();
        let total_share: f64 = stats.job_class_counts.iter().map(|jc| jc.share).sum();
        assert!((total_share - 1.0).abs() < 1e-9);
    }

    #[test]
    fn wait_time_stats_are_correct() {
        let jobs = vec![completed_job(0, "S", 0, 0, 0), completed_job(1, "S", 0, 50, 0)];
        let stats = Statistics::compute(&jobs, &config(), DEFAULT_BIN_COUNT).unwrap();
        assert_eq!(stats.wait_time.min, 0);
        assert_eq!(stats.wait_time.max, 50);
        assert_eq!(stats.wait_time.mean, 25.0);
    }

    #[test]
    fn utilization_counts_distinct_workers_per_tier() {
        let jobs = vec![completed_job(0, "S", 0, 0, 0), completed_job(1, "S", 0, 60, 0), completed_job(2, "S", 0, 0, 1)];
        let stats = Statistics::compute(&jobs, &config(), DEFAULT_BIN_COUNT).unwrap();
        let h = stats.tier_utilization.iter().find(|t| t.tag == "H").unwrap();
        assert_eq!(h.distinct_workers_used, 2);
        assert_eq!(h.total_execution_time, 180);
    }

    #[test]
    fn histogram_bins_cover_the_full_range() {
        let values: Vec<i64> = (0..100).collect();
        let hist = Histogram::build(&values, 10).unwrap();
        assert_eq!(hist.bins.len(), 10);
        let total: usize = hist.bins.iter().map(|b| b.total_count).sum();
        assert_eq!(total, 100);
    }
}
