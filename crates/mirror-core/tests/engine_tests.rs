//! Per-event flow of the sync engine against an in-memory remote

use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use mirror_core::{
    ChangeEvent, ConflictDecision, DecisionProvider, DiffView, SyncEngine, SyncMode, SyncOutcome,
};
use mirror_test_utils::{FakeTransport, ScriptedDecider, TestTree, TransportCall};
use pretty_assertions::assert_eq;
use tokio::sync::Notify;

fn engine(
    tree: &TestTree,
    mode: SyncMode,
    remote: &Arc<FakeTransport>,
    decider: &Arc<ScriptedDecider>,
) -> SyncEngine {
    SyncEngine::new(tree.session("/www", &["*.swp", "cache/"]), mode, remote.clone(), decider.clone())
}

fn upload_call(dir: &str, filename: &str, create_dir: bool) -> TransportCall {
    TransportCall::Upload {
        dir: dir.to_string(),
        filename: filename.to_string(),
        create_dir,
    }
}

#[tokio::test]
async fn direct_mode_uploads_once() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_dir("/www"));
    let decider = Arc::new(ScriptedDecider::never());
    let engine = engine(&tree, SyncMode::Direct, &remote, &decider);

    let outcome = engine.handle(tree.write("a.txt", "hello")).await;

    assert_eq!(outcome, SyncOutcome::Uploaded { attempts: 1 });
    assert_eq!(remote.calls(), vec![upload_call("/www", "a.txt", false)]);
    assert_eq!(remote.file("/www/a.txt"), Some(b"hello".to_vec()));
}

#[tokio::test]
async fn failed_upload_retries_with_directory_creation() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_dir("/www"));
    remote.fail_next_uploads(1);
    let decider = Arc::new(ScriptedDecider::never());
    let engine = engine(&tree, SyncMode::Direct, &remote, &decider);

    let outcome = engine.handle(tree.write("a.txt", "hello")).await;

    assert_eq!(outcome, SyncOutcome::Uploaded { attempts: 2 });
    assert_eq!(
        remote.calls(),
        vec![upload_call("/www", "a.txt", false), upload_call("/www", "a.txt", true)]
    );
}

#[tokio::test]
async fn missing_remote_directory_is_created() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_dir("/www"));
    let decider = Arc::new(ScriptedDecider::never());
    let engine = engine(&tree, SyncMode::Direct, &remote, &decider);

    let outcome = engine.handle(tree.write("css/deep/site.css", "body {}")).await;

    assert_eq!(outcome, SyncOutcome::Uploaded { attempts: 2 });
    assert!(remote.has_dir("/www/css/deep"));
    assert_eq!(remote.file("/www/css/deep/site.css"), Some(b"body {}".to_vec()));
}

#[tokio::test]
async fn second_failure_is_terminal() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_dir("/www"));
    remote.fail_next_uploads(2);
    let decider = Arc::new(ScriptedDecider::never());
    let engine = engine(&tree, SyncMode::Direct, &remote, &decider);

    let outcome = engine.handle(tree.write("a.txt", "hello")).await;

    assert!(matches!(outcome, SyncOutcome::UploadFailed { ref message } if message.contains("553")));
    assert_eq!(remote.upload_count(), 2);
    assert_eq!(remote.file("/www/a.txt"), None);
}

#[tokio::test]
async fn conflict_mode_without_remote_file_skips_fetch() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_dir("/www"));
    let decider = Arc::new(ScriptedDecider::never());
    let engine = engine(&tree, SyncMode::CheckConflicts, &remote, &decider);

    let outcome = engine.handle(tree.write("a.txt", "hello")).await;

    assert_eq!(outcome, SyncOutcome::Uploaded { attempts: 1 });
    assert_eq!(
        remote.calls(),
        vec![
            TransportCall::List { dir: "/www".to_string() },
            upload_call("/www", "a.txt", false),
        ]
    );
    assert_eq!(decider.prompt_count(), 0);
}

#[tokio::test]
async fn similar_names_do_not_count_as_present() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_file("/www/ab.txt", b"other"));
    let decider = Arc::new(ScriptedDecider::never());
    let engine = engine(&tree, SyncMode::CheckConflicts, &remote, &decider);

    let outcome = engine.handle(tree.write("b.txt", "hello")).await;

    assert_eq!(outcome, SyncOutcome::Uploaded { attempts: 1 });
    assert_eq!(remote.download_count(), 0);
}

#[tokio::test]
async fn identical_content_skips_upload() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_file("/www/a.txt", b"same"));
    let decider = Arc::new(ScriptedDecider::never());
    let engine = engine(&tree, SyncMode::CheckConflicts, &remote, &decider);

    let outcome = engine.handle(tree.write("a.txt", "same")).await;

    assert_eq!(outcome, SyncOutcome::Identical);
    assert_eq!(remote.upload_count(), 0);
    assert_eq!(remote.download_count(), 1);
    assert_eq!(decider.prompt_count(), 0);
    tree.assert_no_artifacts();
}

#[tokio::test]
async fn upload_local_is_remembered_for_the_session() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_file("/www/a.txt", b"remote\n"));
    let decider = Arc::new(ScriptedDecider::new([ConflictDecision::UploadLocal]));
    let engine = engine(&tree, SyncMode::CheckConflicts, &remote, &decider);

    let first = engine.handle(tree.write("a.txt", "local\n")).await;

    assert_eq!(first, SyncOutcome::Uploaded { attempts: 1 });
    assert!(engine.session().overrides().contains("a.txt"));
    assert_eq!(remote.file("/www/a.txt"), Some(b"local\n".to_vec()));
    tree.assert_no_artifacts();

    let presented = decider.presented();
    assert_eq!(presented.len(), 1);
    assert!(matches!(&presented[0].1, Some(DiffView::Unified(text)) if text.contains("-remote\n+local")));

    let (lists, downloads) = (remote.list_count(), remote.download_count());
    let second = engine.handle(tree.write("a.txt", "local again\n")).await;

    assert_eq!(second, SyncOutcome::Uploaded { attempts: 1 });
    assert_eq!(remote.list_count(), lists);
    assert_eq!(remote.download_count(), downloads);
    assert_eq!(decider.prompt_count(), 1);
    assert_eq!(remote.file("/www/a.txt"), Some(b"local again\n".to_vec()));
}

#[tokio::test]
async fn listing_failure_counts_as_absent() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_file("/www/a.txt", b"remote"));
    remote.fail_listing();
    let decider = Arc::new(ScriptedDecider::never());
    let engine = engine(&tree, SyncMode::CheckConflicts, &remote, &decider);

    let outcome = engine.handle(tree.write("a.txt", "local")).await;

    assert_eq!(outcome, SyncOutcome::Uploaded { attempts: 1 });
    assert_eq!(remote.download_count(), 0);
}

#[tokio::test]
async fn download_failure_proceeds_with_upload() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_file("/www/a.txt", b"remote"));
    remote.fail_downloads();
    let decider = Arc::new(ScriptedDecider::never());
    let engine = engine(&tree, SyncMode::CheckConflicts, &remote, &decider);

    let outcome = engine.handle(tree.write("a.txt", "local")).await;

    assert_eq!(outcome, SyncOutcome::Uploaded { attempts: 1 });
    assert_eq!(decider.prompt_count(), 0);
    tree.assert_no_artifacts();
}

#[tokio::test]
async fn noise_events_are_dropped_without_remote_calls() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_dir("/www"));
    let decider = Arc::new(ScriptedDecider::never());
    let engine = engine(&tree, SyncMode::CheckConflicts, &remote, &decider);

    std::fs::create_dir_all(tree.path("assets")).unwrap();
    assert_eq!(engine.handle(ChangeEvent::dir(tree.path("assets"))).await, SyncOutcome::Directory);
    assert_eq!(
        engine.handle(tree.write("a_remote_temp.txt", "x")).await,
        SyncOutcome::SelfArtifact
    );
    assert_eq!(
        engine.handle(ChangeEvent::file("/somewhere/else/a.txt")).await,
        SyncOutcome::OutsideRoot
    );
    assert_eq!(engine.handle(tree.write("notes.txt.swp", "x")).await, SyncOutcome::Ignored);
    assert_eq!(engine.handle(tree.write("cache/page.html", "x")).await, SyncOutcome::Ignored);
    assert_eq!(
        engine.handle(ChangeEvent::file(tree.path("gone.txt"))).await,
        SyncOutcome::Vanished
    );

    assert!(remote.calls().is_empty());
}

/// Holds every decision until released.
#[derive(Default)]
struct HeldDecider {
    entered: Notify,
    release: Notify,
    prompts: AtomicUsize,
}

#[async_trait]
impl DecisionProvider for HeldDecider {
    async fn decide(&self, _filename: &str, _diff: Option<&DiffView>) -> mirror_core::Result<ConflictDecision> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.release.notified().await;
        Ok(ConflictDecision::UploadLocal)
    }
}

#[tokio::test]
async fn same_path_waits_while_other_paths_proceed() {
    let tree = TestTree::new();
    let remote = Arc::new(FakeTransport::new().with_file("/www/a.txt", b"remote a"));
    let decider = Arc::new(HeldDecider::default());
    let engine = SyncEngine::new(
        tree.session("/www", &[]),
        SyncMode::CheckConflicts,
        remote.clone(),
        decider.clone(),
    );

    let first = engine.handle(tree.write("a.txt", "local a"));
    let rest = async {
        decider.entered.notified().await;
        let before = remote.calls();

        // Same file: blocked behind the pending decision
        let mut second = pin!(engine.handle(ChangeEvent::file(tree.path("a.txt"))));
        let waited = tokio::time::timeout(Duration::from_millis(50), second.as_mut()).await;
        assert!(waited.is_err());
        assert_eq!(remote.calls(), before);

        // Different file: not blocked
        let other = engine.handle(tree.write("b.txt", "local b")).await;
        assert_eq!(other, SyncOutcome::Uploaded { attempts: 1 });
        assert_eq!(remote.file("/www/b.txt"), Some(b"local b".to_vec()));

        decider.release.notify_one();
        second.await
    };

    let (first, second) = tokio::join!(first, rest);

    assert_eq!(first, SyncOutcome::Uploaded { attempts: 1 });
    // The second event saw the first one's session choice
    assert_eq!(second, SyncOutcome::Uploaded { attempts: 1 });
    assert_eq!(decider.prompts.load(Ordering::SeqCst), 1);
    assert_eq!(remote.list_count(), 2);
    assert_eq!(remote.download_count(), 1);
    assert_eq!(remote.upload_count(), 3);
    tree.assert_no_artifacts();
}
