//! End-to-end scenarios run against the public kernel API, one per
//! concrete scenario.

use jobsim_core::{Configuration, Job, JobClass, JobId, UserClass, WorkerTier};
use jobsim_runtime::Kernel;

fn single_tier_config(tier: WorkerTier, execution_duration: i64) -> Configuration {
    Configuration {
        job_classes: vec![JobClass {
            tag: "S".into(),
            execution_duration,
            weight: 1,
        }],
        user_classes: vec![UserClass {
            tag: "C".into(),
            weight: 1,
            max_jobs_per_request: 1,
        }],
        worker_tiers: vec![tier],
        lambda_per_hour: 100,
    }
}

#[test]
fn s1_single_hot_worker_single_job() {
    let tier = WorkerTier {
        tag: "H".into(),
        capacity: 1,
        priority: 1,
        startup_latency: 0,
        shutdown_latency: 0,
    };
    let config = single_tier_config(tier, 60);
    let job = Job::new(JobId::new(0), "S", "C", 0);
    let completed = Kernel::new(&config).run(&config, vec![job]);

    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].start_execution_time, 0);
    assert_eq!(completed[0].worker_tier.as_deref(), Some("H"));
}

#[test]
fn s2_queueing_on_a_single_worker() {
    let tier = WorkerTier {
        tag: "H".into(),
        capacity: 1,
        priority: 1,
        startup_latency: 0,
        shutdown_latency: 0,
    };
    let config = single_tier_config(tier, 60);
    let jobs = vec![Job::new(JobId::new(0), "S", "C", 0), Job::new(JobId::new(1), "S", "C", 10)];
    let mut completed = Kernel::new(&config).run(&config, jobs);
    completed.sort_by_key(|j| j.id);

    let waits: Vec<i64> = completed.iter().map(|j| j.wait_time()).collect();
    assert_eq!(waits, vec![0, 50]);
}

#[test]
fn s3_cold_activation() {
    let tier = WorkerTier {
        tag: "C".into(),
        capacity: 1,
        priority: 1,
        startup_latency: 300,
        shutdown_latency: 0,
    };
    let config = single_tier_config(tier, 60);
    let job = Job::new(JobId::new(0), "S", "C", 0);
    let completed = Kernel::new(&config).run(&config, vec![job]);

    assert_eq!(completed[0].start_execution_time, 300);
    assert_eq!(completed[0].wait_time(), 300);
}

#[test]
fn s5_shutdown_reclamation() {
    let tier = WorkerTier {
        tag: "H".into(),
        capacity: 1,
        priority: 1,
        startup_latency: 0,
        shutdown_latency: 120,
    };
    let config = single_tier_config(tier, 60);
    let jobs = vec![Job::new(JobId::new(0), "S", "C", 0), Job::new(JobId::new(1), "S", "C", 200)];
    let mut completed = Kernel::new(&config).run(&config, jobs);
    completed.sort_by_key(|j| j.id);

    let waits: Vec<i64> = completed.iter().map(|j| j.wait_time()).collect();
    assert_eq!(waits, vec![0, 0]);
}

#[test]
fn s6_generator_determinism() {
    let config = Configuration::default_config();
    let jobs_a = jobsim_runtime::JobGenerator::new(&config, 123).generate_jobs(0, 3600);
    let jobs_b = jobsim_runtime::JobGenerator::new(&config, 123).generate_jobs(0, 3600);

    let json_a = serde_json::to_string(&jobs_a).unwrap();
    let json_b = serde_json::to_string(&jobs_b).unwrap();
    assert_eq!(json_a, json_b);
}

#[test]
fn universal_invariant_every_event_advances_or_holds_time() {
    // Exercised indirectly: the kernel panics internally if an event
    // fires before virtual time has already advanced past it. A
    // successful run across many jobs is itself evidence the invariant
    // held throughout.
    let tier = WorkerTier {
        tag: "H".into(),
        capacity: 3,
        priority: 1,
        startup_latency: 30,
        shutdown_latency: 30,
    };
    let config = single_tier_config(tier, 45);
    let jobs: Vec<Job> = (0..20).map(|i| Job::new(JobId::new(i), "S", "C", i as i64 * 7)).collect();
    let completed = Kernel::new(&config).run(&config, jobs);
    assert_eq!(completed.len(), 20);
    for job in &completed {
        assert!(job.start_execution_time >= job.submission_time);
    }
}
