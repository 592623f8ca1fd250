//! Review session command tests.

mod common;

use pretty_assertions::assert_eq;
use studydeck_core::algorithm::MAXIMUM_INTERVAL_DAYS;
use studydeck_core::{Rating, SessionPhase};
use studydeck_desktop::commands::{self, ErrorKind};
use uuid::Uuid;

use common::TestContext;

#[tokio::test]
async fn test_start_session_on_empty_topic() {
    let ctx = TestContext::new();
    let (class, topic) = ctx.create_deck(0).await;

    let state = commands::start_session(class.id, topic.id, &ctx.state)
        .await
        .unwrap();

    assert_eq!(state.phase, SessionPhase::Idle);
    assert!(!state.active);
}

#[tokio::test]
async fn test_start_session_missing_topic() {
    let ctx = TestContext::new();
    let class = ctx.create_class("Biology").await;

    let err = commands::start_session(class.id, Uuid::new_v4(), &ctx.state)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_full_session() {
    let ctx = TestContext::new();
    let (class, topic) = ctx.create_deck(3).await;

    let state = commands::start_session(class.id, topic.id, &ctx.state)
        .await
        .unwrap();
    assert_eq!(state.phase, SessionPhase::Question);
    assert_eq!(state.deck.len(), 3);

    let mut last = None;
    for rating in [Rating::Good, Rating::Good, Rating::Easy] {
        commands::reveal_card(&ctx.state).await.unwrap();
        let response = commands::submit_answer(rating.to_value(), &ctx.state)
            .await
            .unwrap();
        assert!(response.outcome.is_some());
        last = Some(response);
    }

    let last = last.unwrap();
    assert_eq!(last.state.phase, SessionPhase::Finished);
    assert_eq!(last.state.score, 430);
    assert_eq!(last.state.score_display(), "000430");

    let summary = last.summary.expect("finished session has a summary");
    assert_eq!(summary.score, 430);
    assert_eq!(summary.max_streak, 4);
    assert_eq!(summary.accuracy, 100);
    assert!(summary.passed);

    // Every rating was written back.
    let classes = commands::list_classes(&ctx.state).await.unwrap();
    let cards = &classes[0].topics[0].flashcards;
    assert!(cards.iter().all(|c| c.schedule.due_date > 0));
    let mut intervals: Vec<f64> = cards.iter().map(|c| c.schedule.interval).collect();
    intervals.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(intervals, vec![1.0, 1.0, 4.0]);
}

#[tokio::test]
async fn test_answer_before_reveal_is_ignored() {
    let ctx = TestContext::new();
    let (class, topic) = ctx.create_deck(2).await;
    commands::start_session(class.id, topic.id, &ctx.state)
        .await
        .unwrap();

    let response = commands::submit_answer(2, &ctx.state).await.unwrap();

    assert!(response.outcome.is_none());
    assert_eq!(response.state.phase, SessionPhase::Question);
    assert_eq!(response.state.position, 0);
    assert_eq!(response.state.score, 0);
}

#[tokio::test]
async fn test_invalid_rating() {
    let ctx = TestContext::new();

    let err = commands::submit_answer(7, &ctx.state).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_answer_after_class_deleted() {
    let ctx = TestContext::new();
    let (class, topic) = ctx.create_deck(2).await;
    commands::start_session(class.id, topic.id, &ctx.state)
        .await
        .unwrap();
    commands::reveal_card(&ctx.state).await.unwrap();

    commands::delete_class(class.id, &ctx.state).await.unwrap();
    let err = commands::submit_answer(2, &ctx.state).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Consistency);
    let state = commands::get_session_state(&ctx.state).await.unwrap();
    assert_eq!(state.phase, SessionPhase::Finished);
}

#[tokio::test]
async fn test_preview_intervals_for_new_card() {
    let ctx = TestContext::new();
    let (class, topic) = ctx.create_deck(1).await;
    commands::start_session(class.id, topic.id, &ctx.state)
        .await
        .unwrap();

    let previews = commands::preview_intervals(&ctx.state).await.unwrap();

    let labels: Vec<&str> = previews.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["<10m", "1d", "1d", "4d"]);
}

#[tokio::test]
async fn test_repeated_easy_restarts() {
    let ctx = TestContext::new();
    let (class, topic) = ctx.create_deck(1).await;
    commands::start_session(class.id, topic.id, &ctx.state)
        .await
        .unwrap();

    for _ in 0..40 {
        commands::reveal_card(&ctx.state).await.unwrap();
        let previews = commands::preview_intervals(&ctx.state).await.unwrap();
        assert_eq!(previews.len(), 4);
        let response = commands::submit_answer(Rating::Easy.to_value(), &ctx.state)
            .await
            .unwrap();
        let outcome = response.outcome.expect("card was revealed");
        assert!(outcome.schedule.due_date > 0);
        commands::restart_session(&ctx.state).await.unwrap();
    }

    let classes = commands::list_classes(&ctx.state).await.unwrap();
    let schedule = classes[0].topics[0].flashcards[0].schedule;
    assert_eq!(schedule.interval, MAXIMUM_INTERVAL_DAYS);
}

#[tokio::test]
async fn test_restart_and_exit() {
    let ctx = TestContext::new();
    let (class, topic) = ctx.create_deck(2).await;

    let err = commands::restart_session(&ctx.state).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    commands::start_session(class.id, topic.id, &ctx.state)
        .await
        .unwrap();
    commands::reveal_card(&ctx.state).await.unwrap();
    commands::submit_answer(Rating::Easy.to_value(), &ctx.state)
        .await
        .unwrap();

    let state = commands::restart_session(&ctx.state).await.unwrap();
    assert_eq!(state.phase, SessionPhase::Question);
    assert_eq!(state.position, 0);
    assert_eq!(state.score, 0);
    assert_eq!(state.streak, 0);

    let state = commands::exit_session(&ctx.state).await.unwrap();
    assert_eq!(state.phase, SessionPhase::Idle);
    assert!(state.deck.is_empty());
}
