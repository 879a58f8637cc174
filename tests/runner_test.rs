//! Tests for the fail-fast step runner.

mod helpers;

use std::sync::Arc;

use helpers::RecordingExecutor;
use mlstrap::MlstrapError;
use mlstrap::runner::StepRunner;
use mlstrap::step::ProvisioningStep;

fn steps(count: usize) -> Vec<ProvisioningStep> {
    (0..count)
        .map(|i| ProvisioningStep::new(format!("step {}", i), format!("echo {}", i)))
        .collect()
}

#[test]
fn test_run_all_executes_every_step_in_order() {
    let executor = Arc::new(RecordingExecutor::new());
    let runner = StepRunner::new(executor.clone());

    let count = runner.run_all(&steps(4)).unwrap();

    assert_eq!(count, 4);
    assert_eq!(executor.calls(), vec!["echo 0", "echo 1", "echo 2", "echo 3"]);
}

#[test]
fn test_run_all_stops_at_first_failure() {
    for failing in 0..5 {
        let executor = Arc::new(RecordingExecutor::failing_on(failing));
        let runner = StepRunner::new(executor.clone());

        let err = runner.run_all(&steps(5)).unwrap_err();

        assert_eq!(executor.call_count(), failing + 1, "failing step {}", failing);
        match err {
            MlstrapError::StepFailure { step, command, .. } => {
                assert_eq!(step, format!("step {}", failing));
                assert_eq!(command, format!("echo {}", failing));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

#[test]
fn test_run_step_failure_carries_executor_reason() {
    let executor = Arc::new(RecordingExecutor::failing_on(0));
    let runner = StepRunner::new(executor);

    let err = runner
        .run_step(&ProvisioningStep::new("Upgrading pip", "pip install -U pip"))
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("pip install -U pip"), "{}", msg);
    assert!(msg.contains("simulated failure on call 0"), "{}", msg);
}

#[test]
fn test_run_all_with_no_steps() {
    let executor = Arc::new(RecordingExecutor::new());
    let runner = StepRunner::new(executor.clone());
    assert_eq!(runner.run_all(&[]).unwrap(), 0);
    assert_eq!(executor.call_count(), 0);
}
