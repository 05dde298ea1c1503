// SPDX-FileCopyrightText: 2026 Quill Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete capture pipeline.
//!
//! Each test builds an isolated TestHarness with a mock channel and a mock
//! record store wired into the real agent loop. Tests are independent and
//! order-insensitive.

use quill_agent::submission::WizardState;
use quill_config::QuillConfig;
use quill_test_utils::{
    MockChannel, MockRecordStore, TestHarness, callback_event, command_event, text_event,
};

async fn walk(
    harness: &mut TestHarness,
    sender: &str,
    story: &str,
    choices: [&str; 3],
) -> String {
    harness.send_text(sender, story).await.unwrap();
    harness.press(sender, choices[0]).await.unwrap();
    harness.press(sender, choices[1]).await.unwrap();
    harness.press(sender, choices[2]).await.unwrap()
}

// ---- Happy path ----

#[tokio::test]
async fn full_walk_writes_one_record_with_labels() {
    let mut harness = TestHarness::builder().build().unwrap();

    let reply = harness
        .send_text(
            "u1",
            "Time blocking for multiple contracts. More detail here.",
        )
        .await
        .unwrap();
    assert!(reply.contains("Story captured!"));
    assert!(reply.contains("Time blocking for multiple contracts"));

    let reply = harness.press("u1", "fw_cc").await.unwrap();
    assert!(reply.contains("The Concurrent Contractor™"));

    let reply = harness.press("u1", "mod_mindset").await.unwrap();
    assert!(reply.contains("Module 1: Mindset"));

    let reply = harness.press("u1", "type_worksheet").await.unwrap();
    assert!(reply.contains("Story Successfully Captured!"));
    assert!(reply.contains("CC30"));
    assert!(reply.contains("Telegram Input"));

    let records = harness.store.records().await;
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["Content ID"], "CC30");
    assert_eq!(record["Framework"], "The Concurrent Contractor™");
    assert_eq!(record["Module"], "Module 1: Mindset");
    assert_eq!(record["Content Type"], "Worksheet");
    assert_eq!(
        record["Title/Asset Name"],
        "Time blocking for multiple contracts"
    );
    assert_eq!(
        record["Summary"],
        "Time blocking for multiple contracts. More detail here."
    );
    assert_eq!(record["Content Status"], "Telegram Input");

    assert_eq!(harness.agent.wizard().state("u1"), WizardState::Empty);
}

#[tokio::test]
async fn every_button_press_is_acknowledged_and_edits_the_menu() {
    let mut harness = TestHarness::builder().build().unwrap();
    walk(
        &mut harness,
        "u1",
        "A story.",
        ["fw_chaos", "mod_general", "type_template"],
    )
    .await;

    assert_eq!(harness.channel.answered_callbacks().await.len(), 3);
    assert_eq!(harness.channel.edits().await.len(), 3);
    // Only the story reply was sent as a new message.
    assert_eq!(harness.channel.sent_count().await, 1);
}

#[tokio::test]
async fn channel_without_edit_gets_new_messages() {
    let mut harness = TestHarness::builder()
        .with_channel(MockChannel::without_edit())
        .build()
        .unwrap();
    walk(
        &mut harness,
        "u1",
        "A story.",
        ["fw_operate", "mod_marketing", "type_email"],
    )
    .await;

    assert!(harness.channel.edits().await.is_empty());
    assert_eq!(harness.channel.sent_count().await, 4);
    assert_eq!(harness.store.records().await.len(), 1);
}

// ---- Identifiers ----

#[tokio::test]
async fn identifiers_increase_by_one() {
    let mut harness = TestHarness::builder().build().unwrap();

    let first = walk(
        &mut harness,
        "u1",
        "First.",
        ["fw_cc", "mod_motive", "type_module"],
    )
    .await;
    let second = walk(
        &mut harness,
        "u1",
        "Second.",
        ["fw_cc", "mod_market", "type_assessment"],
    )
    .await;

    assert!(first.contains("CC30"));
    assert!(second.contains("CC31"));

    let records = harness.store.records().await;
    assert_eq!(records[0]["Content ID"], "CC30");
    assert_eq!(records[1]["Content ID"], "CC31");
}

#[tokio::test]
async fn failed_write_still_consumes_the_identifier() {
    let mut harness = TestHarness::builder()
        .with_store(MockRecordStore::failing("INVALID_PERMISSIONS"))
        .build()
        .unwrap();

    let reply = walk(
        &mut harness,
        "u1",
        "Lost story.",
        ["fw_chaos", "mod_leadmagnet", "type_leadmagnet"],
    )
    .await;
    assert!(reply.contains("Story Captured Locally"));
    assert!(reply.contains("Sync failed"));
    assert!(reply.contains("CC30"));
    assert!(reply.contains("Lead Magnet"));

    let status = harness.command("u1", "status").await.unwrap();
    assert!(status.contains("CC31"), "got: {status}");

    assert_eq!(harness.store.attempts(), 1);
    assert!(harness.store.records().await.is_empty());
    assert_eq!(harness.agent.wizard().pending_count(), 0);
}

#[tokio::test]
async fn file_counter_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = QuillConfig::default();
    config.content.counter_path = Some(dir.path().join("counter").display().to_string());

    {
        let mut harness = TestHarness::builder()
            .with_config(config.clone())
            .build()
            .unwrap();
        let reply = walk(
            &mut harness,
            "u1",
            "Before restart.",
            ["fw_cc", "mod_manage", "type_template"],
        )
        .await;
        assert!(reply.contains("CC30"));
    }

    let mut harness = TestHarness::builder().with_config(config).build().unwrap();
    let status = harness.command("u1", "status").await.unwrap();
    assert!(status.contains("CC31"), "got: {status}");
}

// ---- Wizard ordering ----

#[tokio::test]
async fn new_story_mid_flow_restarts_the_wizard() {
    let mut harness = TestHarness::builder().build().unwrap();

    harness.send_text("u1", "Old text.").await.unwrap();
    harness.press("u1", "fw_chaos").await.unwrap();
    assert_eq!(
        harness.agent.wizard().state("u1"),
        WizardState::AwaitingModule
    );

    harness.send_text("u1", "New text.").await.unwrap();
    assert_eq!(
        harness.agent.wizard().state("u1"),
        WizardState::AwaitingFramework
    );

    harness.press("u1", "fw_operate").await.unwrap();
    harness.press("u1", "mod_general").await.unwrap();
    harness.press("u1", "type_worksheet").await.unwrap();

    let records = harness.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["Summary"], "New text.");
    assert_eq!(records[0]["Framework"], "OPERATE Framework™");
}

#[tokio::test]
async fn button_without_story_gets_a_hint() {
    let mut harness = TestHarness::builder().build().unwrap();

    let reply = harness.press("u1", "mod_mindset").await.unwrap();
    assert!(reply.contains("no story in progress"), "got: {reply}");
    assert_eq!(harness.store.attempts(), 0);
}

#[tokio::test]
async fn module_from_another_framework_is_rejected() {
    let mut harness = TestHarness::builder().build().unwrap();

    harness.send_text("u1", "A story.").await.unwrap();
    harness.press("u1", "fw_chaos").await.unwrap();

    let reply = harness.press("u1", "mod_mindset").await.unwrap();
    assert!(reply.contains("not a module option"), "got: {reply}");
    assert_eq!(
        harness.agent.wizard().state("u1"),
        WizardState::AwaitingModule
    );
}

#[tokio::test]
async fn stale_framework_button_leaves_submission_untouched() {
    let mut harness = TestHarness::builder().build().unwrap();

    harness.send_text("u1", "A story.").await.unwrap();
    harness.press("u1", "fw_cc").await.unwrap();

    let reply = harness.press("u1", "type_email").await.unwrap();
    assert!(reply.contains("no longer active"), "got: {reply}");
    assert_eq!(
        harness.agent.wizard().state("u1"),
        WizardState::AwaitingModule
    );
}

#[tokio::test]
async fn senders_are_isolated() {
    let mut harness = TestHarness::builder().build().unwrap();

    harness.send_text("alice", "Alice story.").await.unwrap();
    harness.send_text("bob", "Bob story.").await.unwrap();
    harness.press("alice", "fw_cc").await.unwrap();
    harness.press("bob", "fw_chaos").await.unwrap();
    harness.press("bob", "mod_general").await.unwrap();
    harness.press("bob", "type_email").await.unwrap();

    assert_eq!(
        harness.agent.wizard().state("alice"),
        WizardState::AwaitingModule
    );

    harness.press("alice", "mod_motive").await.unwrap();
    harness.press("alice", "type_module").await.unwrap();

    let records = harness.store.records().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["Summary"], "Bob story.");
    assert_eq!(records[0]["Content ID"], "CC30");
    assert_eq!(records[1]["Summary"], "Alice story.");
    assert_eq!(records[1]["Content ID"], "CC31");
}

// ---- Commands ----

#[tokio::test]
async fn status_reports_next_id_and_catalog_sizes() {
    let mut harness = TestHarness::builder().build().unwrap();

    let reply = harness.command("u1", "status").await.unwrap();
    assert!(reply.contains("Next Content ID: CC30"));
    assert!(reply.contains("Framework options: 3"));
    assert!(reply.contains("Module options: 8"));
    assert!(reply.contains("Content types: 6"));
}

#[tokio::test]
async fn cancel_discards_the_pending_story() {
    let mut harness = TestHarness::builder().build().unwrap();

    harness.send_text("u1", "Never mind.").await.unwrap();
    let reply = harness.command("u1", "cancel").await.unwrap();
    assert!(reply.contains("discarded"));
    assert_eq!(harness.agent.wizard().pending_count(), 0);

    let reply = harness.press("u1", "fw_cc").await.unwrap();
    assert!(reply.contains("no story in progress"));
}

#[tokio::test]
async fn start_and_help_do_not_touch_the_wizard() {
    let mut harness = TestHarness::builder().build().unwrap();

    harness.send_text("u1", "Keep me.").await.unwrap();
    harness.command("u1", "start").await.unwrap();
    let help = harness.command("u1", "help").await.unwrap();
    assert!(help.contains("CC30"), "got: {help}");

    assert_eq!(
        harness.agent.wizard().state("u1"),
        WizardState::AwaitingFramework
    );
}

// ---- Event loop ----

#[tokio::test]
async fn scripted_session_runs_through_the_loop_and_shuts_down() {
    let mut harness = TestHarness::builder().build().unwrap();

    harness
        .run_script(vec![
            command_event("u1", "start"),
            text_event("u1", "Scripted story. With two sentences."),
            callback_event("u1", "fw_operate"),
            callback_event("u1", "mod_marketing"),
            callback_event("u1", "type_email"),
            text_event("u2", "Left pending."),
        ])
        .await
        .unwrap();

    let records = harness.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["Title/Asset Name"], "Scripted story");
    assert_eq!(records[0]["Module"], "Marketing Funnel");

    assert_eq!(harness.agent.wizard().pending_count(), 1);
    assert!(harness.channel.is_shut_down());
    assert!(harness.store.is_shut_down());
}

#[tokio::test]
async fn loop_survives_invalid_input() {
    let mut harness = TestHarness::builder().build().unwrap();

    harness
        .run_script(vec![
            callback_event("u1", "type_email"),
            callback_event("u1", "garbage"),
            text_event("u1", "   "),
            command_event("u1", "frobnicate"),
            text_event("u1", "Real story."),
            callback_event("u1", "fw_cc"),
            callback_event("u1", "mod_launchpad"),
            callback_event("u1", "type_assessment"),
        ])
        .await
        .unwrap();

    let records = harness.store.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["Module"], "Module 5: Launchpad");
    assert_eq!(records[0]["Content ID"], "CC30");
}
