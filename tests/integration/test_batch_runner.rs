//! Integration Tests for the Batch Runner
//!
//! Real scripts through `/bin/sh`, plus the mock executor where the point is
//! ordering rather than process handling.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use scriptdeck::{
    AuditLog, BatchEvent, BatchItem, BatchObserver, BatchRunner, InterpreterExecutor,
    RecordingObserver,
};
use std::sync::Arc;
use test_utils::{MockExecutor, ScriptTree};
use tokio_util::sync::CancellationToken;

fn shell_runner(tree: &ScriptTree) -> (BatchRunner, Arc<AuditLog>) {
    let audit = Arc::new(AuditLog::open(tree.logs_dir()));
    let executor = InterpreterExecutor::new(&tree.config().interpreter, Arc::clone(&audit));
    (BatchRunner::new(Arc::new(executor), Arc::clone(&audit)), audit)
}

#[cfg(unix)]
#[tokio::test]
async fn test_batch_of_three_emits_n_of_each() {
    let tree = ScriptTree::new();
    let items: Vec<BatchItem> = ["one", "two", "three"]
        .iter()
        .map(|name| {
            let path = tree.script("Demo", &format!("{}.sh", name), &format!("echo {}\n", name));
            BatchItem::from_path(path)
        })
        .collect();

    let (runner, _audit) = shell_runner(&tree);
    let observer = RecordingObserver::new();
    let summary = runner
        .run_batch(&items, &observer, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.completed, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        observer.statuses(),
        vec!["Running: one", "Running: two", "Running: three"]
    );
    // Announcement plus combined output per item
    let outputs = observer.outputs();
    assert_eq!(outputs.len(), 6);
    assert!(outputs[0].starts_with(">>> Running "));
    assert_eq!(outputs[1], "one\n");
    assert_eq!(outputs[5], "three\n");
    assert_eq!(observer.progress(), vec![1.0 / 3.0, 2.0 / 3.0, 1.0]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_script_then_passing_script() {
    let tree = ScriptTree::new();
    let failing = tree.script("Demo", "broken.sh", "echo nope >&2\nexit 7\n");
    let passing = tree.script("Demo", "fine.sh", "echo fine\n");

    let (runner, audit) = shell_runner(&tree);
    let observer = RecordingObserver::new();
    let summary = runner
        .run_batch(
            &[BatchItem::from_path(&failing), BatchItem::from_path(&passing)],
            &observer,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(summary.completed, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(observer.end_count(), 1);
    assert_eq!(observer.outputs()[3], "fine\n");

    let log = std::fs::read_to_string(audit.current_log_file()).unwrap();
    assert!(log.contains(&format!("Completed: {} - ExitCode 7", failing.display())));
    assert!(log.contains(&format!("Completed: {} - ExitCode 0", passing.display())));
}

#[cfg(unix)]
#[tokio::test]
async fn test_scripts_run_one_at_a_time_in_order() {
    let tree = ScriptTree::new();
    let trace = tree.root().join("trace.txt");
    let items: Vec<BatchItem> = (1..=4)
        .map(|i| {
            let body = format!(
                "echo start{i} >> '{t}'\nsleep 0.05\necho end{i} >> '{t}'\n",
                i = i,
                t = trace.display()
            );
            BatchItem::from_path(tree.script("Seq", &format!("s{}.sh", i), &body))
        })
        .collect();

    let (runner, _audit) = shell_runner(&tree);
    runner
        .run_batch(&items, &RecordingObserver::new(), &CancellationToken::new())
        .await
        .unwrap();

    let lines: Vec<String> = std::fs::read_to_string(&trace)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    let expected: Vec<String> = (1..=4)
        .flat_map(|i| vec![format!("start{}", i), format!("end{}", i)])
        .collect();
    assert_eq!(lines, expected);
}

/// Cancels the batch once the first item has reported progress
struct CancelAfterFirst {
    inner: RecordingObserver,
    cancel: CancellationToken,
}

impl BatchObserver for CancelAfterFirst {
    fn on_status(&self, text: &str) {
        self.inner.on_status(text);
    }

    fn on_output_append(&self, text: &str) {
        self.inner.on_output_append(text);
    }

    fn on_progress(&self, fraction: f64) {
        self.inner.on_progress(fraction);
        self.cancel.cancel();
    }

    fn on_batch_start(&self) {
        self.inner.on_batch_start();
    }

    fn on_batch_end(&self) {
        self.inner.on_batch_end();
    }
}

#[tokio::test]
async fn test_cancellation_stops_between_items() {
    let tree = ScriptTree::new();
    let items: Vec<BatchItem> = ["a", "b", "c"]
        .iter()
        .map(|n| BatchItem::from_path(tree.script("Cat", &format!("{}.sh", n), "true")))
        .collect();

    let executor = Arc::new(MockExecutor::new());
    let audit = Arc::new(AuditLog::open(tree.logs_dir()));
    let runner = BatchRunner::new(executor.clone(), audit);
    let cancel = CancellationToken::new();
    let observer = CancelAfterFirst {
        inner: RecordingObserver::new(),
        cancel: cancel.clone(),
    };

    let summary = runner.run_batch(&items, &observer, &cancel).await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.skipped(), 2);
    assert_eq!(executor.calls().len(), 1);
    assert_eq!(observer.inner.progress(), vec![1.0 / 3.0]);
    assert_eq!(observer.inner.end_count(), 1);
}

#[tokio::test]
async fn test_spawned_batch_ends_with_finished() {
    let tree = ScriptTree::new();
    let items: Vec<BatchItem> = ["x", "y"]
        .iter()
        .map(|n| BatchItem::from_path(tree.script("Cat", &format!("{}.sh", n), "true")))
        .collect();

    let audit = Arc::new(AuditLog::open(tree.logs_dir()));
    let runner = Arc::new(BatchRunner::new(Arc::new(MockExecutor::new()), audit));
    let (mut events, handle) = runner.spawn_batch(items, CancellationToken::new());

    let mut kinds = Vec::new();
    while let Some(event) = events.recv().await {
        kinds.push(match event {
            BatchEvent::Started { .. } => "start",
            BatchEvent::Status(_) => "status",
            BatchEvent::Output(_) => "output",
            BatchEvent::Progress(_) => "progress",
            BatchEvent::Finished(_) => "finished",
        });
    }
    let summary = handle.await.unwrap().unwrap();

    assert_eq!(
        kinds,
        vec![
            "start", "status", "output", "output", "progress", "status", "output", "output",
            "progress", "finished"
        ]
    );
    assert_eq!(summary.completed, 2);
}
