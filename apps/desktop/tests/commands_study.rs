//! Review session command tests.

mod common;

use common::{fixtures, TestContext};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use vocab_core::types::MasteryStage;
use word_review_lib::backup::BackupOutcome;
use word_review_lib::commands;

fn set(words: Vec<String>) -> BTreeSet<String> {
    words.into_iter().collect()
}

#[test]
fn test_due_today_follows_buckets() {
    let ctx = TestContext::with_data_file(&fixtures::data_file(&[
        ("fresh", 0, None),
        ("weak", 2, Some(0)),
        ("due", 3, Some(2)),
        ("early", 3, Some(1)),
    ]));

    // "weak" was graded today; "early" is only in through the backfill.
    let due = set(commands::due_today(&ctx.state).unwrap());
    assert_eq!(
        due,
        set(vec!["due".into(), "early".into(), "fresh".into()])
    );
}

#[test]
fn test_review_walk_grades_every_word_once() {
    let ctx = TestContext::with_data_file(&fixtures::data_file(&[
        ("a", 0, None),
        ("b", 1, Some(3)),
        ("c", 2, Some(1)),
    ]));

    let mut seen = vec![];
    while let Some(next) = commands::next_word(&ctx.state).unwrap() {
        assert_eq!(next.total, 3);
        assert_eq!(next.done, seen.len());
        commands::grade_word(&next.word, true, &ctx.state).unwrap();
        seen.push(next.word);
    }
    seen.sort();
    assert_eq!(seen, vec!["a", "b", "c"]);

    let stats = commands::get_statistics(&ctx.state).unwrap();
    assert_eq!((stats.today_done, stats.today_total), (3, 3));
    assert_eq!(stats.mastered, 1);

    // Graded words stay done after a restart.
    assert!(commands::due_today(&ctx.reopen()).unwrap().is_empty());
}

#[test]
fn test_unknown_grade_keeps_level() {
    let ctx = TestContext::with_data_file(&fixtures::data_file(&[("lucid", 2, Some(1))]));
    let graded = commands::grade_word("lucid", false, &ctx.state).unwrap();
    assert_eq!(graded.review_count, 2);
    assert_eq!(graded.stage, MasteryStage::Reviewing);

    let graded = commands::grade_word("lucid", true, &ctx.state).unwrap();
    assert_eq!(graded.review_count, 3);
    assert_eq!(graded.stage, MasteryStage::Mastered);

    let file = ctx.data_file();
    assert_eq!(file["words"]["lucid"]["last_review_date"], fixtures::days_ago(0));
}

#[test]
fn test_check_answer_returns_reference() {
    let ctx = TestContext::new();
    commands::import_lines("lucid,清楚的；明晰的", &ctx.state).unwrap();

    let check = commands::check_answer("lucid", " 清楚 ", &ctx.state).unwrap();
    assert!(check.is_correct);
    assert_eq!(check.meaning, "清楚的；明晰的");

    let check = commands::check_answer("lucid", "模糊", &ctx.state).unwrap();
    assert!(!check.is_correct);

    let err = commands::check_answer("ghost", "x", &ctx.state).unwrap_err();
    assert_eq!(err.operation, "check_answer");
}

#[test]
fn test_malformed_date_is_due_and_kept() {
    let ctx = TestContext::with_data_file(
        r#"{"version": 2, "words": {"odd": {"meaning": "m", "review_count": 5, "last_review": "", "last_review_date": "someday"}}}"#,
    );
    assert_eq!(commands::due_today(&ctx.state).unwrap(), vec!["odd"]);
    commands::update_meaning("odd", "m2", &ctx.state).unwrap();
    assert_eq!(ctx.data_file()["words"]["odd"]["last_review_date"], "someday");
}

#[test]
fn test_daily_backup_runs_once() {
    let ctx = TestContext::with_data_file(&fixtures::data_file(&[("a", 0, None), ("b", 4, Some(9))]));
    assert_eq!(
        commands::run_daily_backup(&ctx.state).unwrap(),
        BackupOutcome::Completed { rows: 2 }
    );
    assert_eq!(
        commands::run_daily_backup(&ctx.state).unwrap(),
        BackupOutcome::AlreadyDone
    );
    assert!(ctx.dir.path().join("words_backup.db").exists());
    assert!(ctx.dir.path().join("backup_log.txt").exists());
}
