//! Contract Tests for the Observer Surface
//!
//! Ordering and bracketing guarantees a front end relies on.

#[path = "../test_utils/mod.rs"]
mod test_utils;

use scriptdeck::{
    AuditLog, BatchEvent, BatchItem, BatchObserver, BatchRunner, ChannelObserver,
    RecordingObserver,
};
use std::sync::{Arc, Mutex};
use test_utils::{MockExecutor, ScriptTree};
use tokio_util::sync::CancellationToken;

/// Logs every callback as a short tag
#[derive(Default)]
struct TagObserver {
    tags: Mutex<Vec<String>>,
}

impl TagObserver {
    fn push(&self, tag: String) {
        self.tags.lock().unwrap().push(tag);
    }
}

impl BatchObserver for TagObserver {
    fn on_status(&self, text: &str) {
        self.push(format!("status:{}", text));
    }

    fn on_output_append(&self, text: &str) {
        let tag = if text.starts_with(">>> ") { "announce" } else { "output" };
        self.push(tag.to_string());
    }

    fn on_progress(&self, fraction: f64) {
        self.push(format!("progress:{:.2}", fraction));
    }

    fn on_batch_start(&self) {
        self.push("start".to_string());
    }

    fn on_batch_end(&self) {
        self.push("end".to_string());
    }
}

fn runner_with_items(tree: &ScriptTree, names: &[&str]) -> (BatchRunner, Vec<BatchItem>) {
    let items = names
        .iter()
        .map(|n| BatchItem::from_path(tree.script("Cat", &format!("{}.sh", n), "true")))
        .collect();
    let runner = BatchRunner::new(
        Arc::new(MockExecutor::new().with_exit_code("bad", 3)),
        Arc::new(AuditLog::open(tree.logs_dir())),
    );
    (runner, items)
}

#[tokio::test]
async fn test_callbacks_are_bracketed_and_grouped_per_item() {
    let tree = ScriptTree::new();
    let (runner, items) = runner_with_items(&tree, &["first", "bad", "last"]);
    let observer = TagObserver::default();

    runner
        .run_batch(&items, &observer, &CancellationToken::new())
        .await
        .unwrap();

    let tags = observer.tags.lock().unwrap().clone();
    assert_eq!(
        tags,
        vec![
            "start",
            "status:Running: first",
            "announce",
            "output",
            "progress:0.33",
            "status:Running: bad",
            "announce",
            "output",
            "progress:0.67",
            "status:Running: last",
            "announce",
            "output",
            "progress:1.00",
            "end",
        ]
    );
}

#[tokio::test]
async fn test_progress_is_strictly_increasing_and_ends_at_one() {
    let tree = ScriptTree::new();
    let names: Vec<String> = (0..7).map(|i| format!("s{}", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (runner, items) = runner_with_items(&tree, &refs);
    let observer = RecordingObserver::new();

    runner
        .run_batch(&items, &observer, &CancellationToken::new())
        .await
        .unwrap();

    let progress = observer.progress();
    assert_eq!(progress.len(), 7);
    assert!(progress.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(*progress.last().unwrap(), 1.0);
    assert!(progress[..6].iter().all(|p| *p < 1.0));
}

#[tokio::test]
async fn test_channel_observer_matches_direct_callbacks() {
    let tree = ScriptTree::new();
    let (runner, items) = runner_with_items(&tree, &["a", "bad"]);

    let recording = RecordingObserver::new();
    runner
        .run_batch(&items, &recording, &CancellationToken::new())
        .await
        .unwrap();

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let channel = ChannelObserver::new(tx, items.len());
    runner
        .run_batch(&items, &channel, &CancellationToken::new())
        .await
        .unwrap();
    drop(channel);

    let mut streamed = Vec::new();
    while let Some(event) = rx.recv().await {
        streamed.push(event);
    }

    assert_eq!(streamed.first(), Some(&BatchEvent::Started { total: 2 }));
    assert_eq!(&streamed[1..], &recording.events()[..]);
}

#[tokio::test]
async fn test_runner_is_reusable_after_a_batch() {
    let tree = ScriptTree::new();
    let (runner, items) = runner_with_items(&tree, &["again"]);

    for _ in 0..3 {
        let observer = RecordingObserver::new();
        let summary = runner
            .run_batch(&items, &observer, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(summary.completed, 1);
        assert_eq!(observer.start_count(), 1);
        assert_eq!(observer.end_count(), 1);
    }
}
