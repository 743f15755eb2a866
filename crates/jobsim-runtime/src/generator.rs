//! Job arrival generator.
//!
//! Produces the complete list of jobs submitted in `[start, end)` given
//! a configuration and a seeded RNG. Determinism is a function of the
//! seed only — the same seed, configuration, and window always produce
//! byte-identical output (§8 "Generator determinism").

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use jobsim_core::{Configuration, Job, JobId};

/// Builds a cyclic, proportionally-weighted sampling bag: each tag
/// appears `weight` times, then the whole multiset is shuffled once.
/// `bag[k % bag.len()]` then yields exact proportional sampling without
/// rejection, at the cost of a fixed (but randomized) cyclic pattern.
fn build_bag(weights: &[(String, u32)], rng: &mut impl Rng) -> Vec<String> {
    let mut bag = Vec::new();
    for (tag, weight) in weights {
        for _ in 0..*weight {
            bag.push(tag.clone());
        }
    }
    bag.shuffle(rng);
    bag
}

pub struct JobGenerator {
    rng: ChaCha8Rng,
    job_bag: Vec<String>,
    user_bag: Vec<String>,
    lambda_per_hour: u32,
    max_jobs_per_request: Vec<(String, u32)>,
    job_idx: usize,
    user_idx: usize,
    next_id: u64,
    jobs: Vec<Job>,
}

impl JobGenerator {
    pub fn new(config: &Configuration, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let job_weights: Vec<(String, u32)> = config.job_classes.iter().map(|c| (c.tag.clone(), c.weight)).collect();
        let user_weights: Vec<(String, u32)> = config.user_classes.iter().map(|c| (c.tag.clone(), c.weight)).collect();
        let job_bag = build_bag(&job_weights, &mut rng);
        let user_bag = build_bag(&user_weights, &mut rng);
        let max_jobs_per_request = config
            .user_classes
            .iter()
            .map(|c| (c.tag.clone(), c.max_jobs_per_request))
            .collect();

        JobGenerator {
            rng,
            job_bag,
            user_bag,
            lambda_per_hour: config.lambda_per_hour,
            max_jobs_per_request,
            job_idx: 0,
            user_idx: 0,
            next_id: 0,
            jobs: Vec::new(),
        }
    }

    /// `⌊Exp(λ/3600)⌋` seconds. Truncating (rather than rounding) matches
    /// the original source and can yield a zero-second gap at high λ —
    /// a legal, explicitly anticipated edge case (§4.D).
    fn sample_interarrival(&mut self) -> i64 {
        let rate_per_second = self.lambda_per_hour as f64 / 3600.0;
        let u: f64 = self.rng.gen_range(f64::MIN_POSITIVE..1.0);
        let gap = -u.ln() / rate_per_second;
        gap.floor() as i64
    }

    fn max_jobs_for(&self, user_class: &str) -> u32 {
        self.max_jobs_per_request
            .iter()
            .find(|(tag, _)| tag == user_class)
            .map(|(_, n)| *n)
            .unwrap_or(1)
    }

    fn generate_job(&mut self, submission_time: i64, user_class: &str) -> Job {
        let job_class = self.job_bag[self.job_idx % self.job_bag.len()].clone();
        self.job_idx += 1;
        let id = JobId::new(self.next_id);
        self.next_id += 1;
        Job::new(id, job_class, user_class.to_string(), submission_time)
    }

    fn handle_user_request(&mut self, user_request_time: i64) {
        let user_class = self.user_bag[self.user_idx % self.user_bag.len()].clone();
        self.user_idx += 1;
        let max_n = self.max_jobs_for(&user_class).max(1);
        let n = self.rng.gen_range(1..=max_n);
        for _ in 0..n {
            let job = self.generate_job(user_request_time, &user_class);
            self.jobs.push(job);
        }
    }

    /// Produce the complete job stream for `[start, end)`. If
    /// `start >= end` the result is empty. The final user-request batch
    /// may land at or after `end`, matching the original generator: the
    /// loop tests the *pre-arrival* clock, not the newly sampled one.
    pub fn generate_jobs(&mut self, start: i64, end: i64) -> Vec<Job> {
        let mut t = start;
        while t < end {
            let gap = self.sample_interarrival();
            t += gap;
            self.handle_user_request(t);
        }
        self.jobs.clone()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }
}
