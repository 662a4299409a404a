//! Bulk lookup command tests.

mod common;

use common::TestContext;
use pretty_assertions::assert_eq;
use vocab_core::NO_DEFINITION;
use word_review_lib::commands;
use word_review_lib::fetch::FetchEvent;

#[tokio::test]
async fn test_fetch_adds_candidates_from_text() {
    let ctx = TestContext::new();
    commands::import_lines("apple,苹果", &ctx.state).unwrap();

    let (candidates, mut handle) =
        commands::start_fetch("Apple, lucid\nvivid | obscureword", &ctx.state).unwrap();
    assert_eq!(candidates, vec!["lucid", "vivid", "obscureword"]);

    let mut progress = vec![];
    let mut finished = None;
    while let Some(event) = handle.next_event().await {
        match event {
            FetchEvent::Progress { current, total, .. } => progress.push((current, total)),
            FetchEvent::Finished(summary) => finished = Some(summary),
        }
    }
    assert_eq!(progress, vec![(1, 3), (2, 3), (3, 3)]);
    let summary = finished.unwrap();
    assert_eq!(summary.added, 3);
    assert!(!summary.cancelled);

    let reopened = ctx.reopen();
    let book = reopened.book.lock().unwrap();
    assert_eq!(book.get("lucid").unwrap().examples[0].text, "A lucid account.");
    assert_eq!(book.get("obscureword").unwrap().meaning, NO_DEFINITION);
}

#[tokio::test]
async fn test_cancel_without_fetch_reports_false() {
    let ctx = TestContext::new();
    assert!(!commands::cancel_fetch(&ctx.state).unwrap());

    let handle = commands::start_fetch_words(vec![], &ctx.state).unwrap();
    assert!(commands::cancel_fetch(&ctx.state).unwrap());
    assert!(handle.is_cancelled());
    let summary = handle.wait().await.unwrap();
    assert_eq!(summary.added, 0);
}
