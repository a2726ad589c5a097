use std::sync::Arc;
use std::time::Duration;

use muellbot_models::chrono::{Days, Local};
use muellbot_models::reminder::{DATE_FORMAT, Reminder, TrashKind};
use muellbot_storage::{InMemoryReminderStore, ReminderStore};

use super::test_utils::*;
use crate::ReminderError;
use crate::fire::DELIVERY_ATTEMPTS;

fn future_date(days: u64) -> String {
    (Local::now().date_naive() + Days::new(days))
        .format(DATE_FORMAT)
        .to_string()
}

fn past_date(days: u64) -> String {
    (Local::now().date_naive() - Days::new(days))
        .format(DATE_FORMAT)
        .to_string()
}

#[tokio::test(start_paused = true)]
async fn added_reminder_is_listed_exactly_once() {
    let ctx = TestContext::new();
    let date = future_date(10);

    ctx.service.add(42, &date, "bio").await.unwrap();

    let listed = ctx.service.list(Some(42)).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].key.kind, TrashKind::Bio);
    assert_eq!(listed[0].key.due_date.format(DATE_FORMAT).to_string(), date);
}

#[tokio::test(start_paused = true)]
async fn adding_the_same_key_twice_replaces_instead_of_duplicating() {
    let ctx = TestContext::new();
    let date = future_date(2);

    ctx.service.add(42, &date, "bio").await.unwrap();
    ctx.service.add(42, &date, "bio").await.unwrap();

    assert_eq!(ctx.service.list(Some(42)).await.unwrap().len(), 1);

    // The replaced timer is gone too: only one notification goes out.
    tokio::time::sleep(Duration::from_secs(3 * 24 * 3600)).await;
    assert_eq!(ctx.delivered.lock().unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn listing_is_ordered_by_due_date_and_scoped_to_the_recipient() {
    let ctx = TestContext::new();

    ctx.service.add(42, &future_date(20), "papier").await.unwrap();
    ctx.service.add(42, &future_date(5), "bio").await.unwrap();
    ctx.service.add(7, &future_date(8), "rest").await.unwrap();

    let listed = ctx.service.list(Some(42)).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].key.kind, TrashKind::Bio);
    assert_eq!(listed[1].key.kind, TrashKind::Papier);

    assert_eq!(ctx.service.list(None).await.unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn remove_reports_true_and_clears_the_listing() {
    let ctx = TestContext::new();
    let date = future_date(10);

    ctx.service.add(42, &date, "bio").await.unwrap();

    assert!(ctx.service.remove(42, &date, "bio").await.unwrap());
    assert!(ctx.service.list(Some(42)).await.unwrap().is_empty());
    assert!(ctx.store.get_all().await.unwrap().is_empty());

    // The cancelled timer never fires.
    tokio::time::sleep(Duration::from_secs(11 * 24 * 3600)).await;
    assert!(ctx.delivered.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn remove_of_an_unknown_reminder_reports_false_and_touches_nothing() {
    let ctx = TestContext::new();
    let date = future_date(10);

    ctx.service.add(42, &date, "bio").await.unwrap();

    assert!(!ctx.service.remove(42, &date, "rest").await.unwrap());
    assert!(!ctx.service.remove(7, &date, "bio").await.unwrap());
    assert_eq!(ctx.service.list(None).await.unwrap().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn malformed_date_is_rejected_without_mutation() {
    let ctx = TestContext::new();

    let error = ctx.service.add(42, "1.1.2026", "plastik").await.unwrap_err();

    assert!(matches!(error, ReminderError::InvalidDate { .. }));
    assert!(ctx.service.list(None).await.unwrap().is_empty());

    let error = ctx.service.add(42, "not a date", "bio").await.unwrap_err();
    assert!(matches!(error, ReminderError::InvalidDate { .. }));
}

#[tokio::test(start_paused = true)]
async fn unknown_kind_is_rejected_without_mutation() {
    let ctx = TestContext::new();

    let error = ctx
        .service
        .add(42, &future_date(10), "glas")
        .await
        .unwrap_err();

    assert!(matches!(error, ReminderError::InvalidKind { .. }));
    assert!(ctx.service.list(None).await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn notification_fires_one_day_ahead_of_the_due_date() {
    let ctx = TestContext::new();

    ctx.service.add(42, &future_date(3), "bio").await.unwrap();

    tokio::time::sleep(Duration::from_secs(12 * 3600)).await;
    assert!(ctx.delivered.lock().unwrap().is_empty(), "fired too early");

    tokio::time::sleep(Duration::from_secs(2 * 24 * 3600)).await;
    assert_eq!(ctx.delivered.lock().unwrap().len(), 1);
    assert!(ctx.store.get_all().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn elapsed_reminders_fire_on_the_next_evaluation() {
    let ctx = TestContext::new();

    ctx.service.add(42, &past_date(2), "rest").await.unwrap();

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(ctx.delivered.lock().unwrap().len(), 1);
    assert!(ctx.store.get_all().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_delivery_is_retried_until_it_succeeds() {
    let store = Arc::new(InMemoryReminderStore::new());
    let channel = Arc::new(FlakyDeliveryChannel::new(2));
    let service = service_with_channel(store.clone(), channel.clone());

    service.add(42, &past_date(1), "bio").await.unwrap();

    tokio::time::sleep(Duration::from_secs(600)).await;
    assert_eq!(channel.attempts(), 3);
    assert_eq!(channel.delivered.lock().unwrap().len(), 1);
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn delivery_gives_up_after_bounded_attempts() {
    let store = Arc::new(InMemoryReminderStore::new());
    let channel = Arc::new(FlakyDeliveryChannel::new(u32::MAX));
    let service = service_with_channel(store.clone(), channel.clone());

    service.add(42, &past_date(1), "bio").await.unwrap();

    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert_eq!(channel.attempts(), DELIVERY_ATTEMPTS);
    assert!(channel.delivered.lock().unwrap().is_empty());

    // The record is still removed: a reminder never fires twice.
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn restore_rearms_stored_reminders() {
    let store = Arc::new(InMemoryReminderStore::new());
    let overdue = Reminder::pending(
        42,
        Local::now().date_naive() - Days::new(1),
        TrashKind::Rest,
    );
    let upcoming = Reminder::pending(
        42,
        Local::now().date_naive() + Days::new(10),
        TrashKind::Bio,
    );
    store.put(&overdue).await.unwrap();
    store.put(&upcoming).await.unwrap();

    let channel = Arc::new(CapturingDeliveryChannel::default());
    let delivered = channel.delivered.clone();
    let service = service_with_channel(store.clone(), channel);

    assert_eq!(service.restore().await.unwrap(), 2);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(delivered.lock().unwrap().clone(), vec![overdue.key.clone()]);

    tokio::time::sleep(Duration::from_secs(11 * 24 * 3600)).await;
    let all = delivered.lock().unwrap().clone();
    assert_eq!(all.len(), 2);
    assert!(all.contains(&upcoming.key));
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn remove_races_with_firing_deterministically() {
    let ctx = TestContext::new();
    let date = past_date(1);

    ctx.service.add(42, &date, "bio").await.unwrap();
    let removed = ctx.service.remove(42, &date, "bio").await.unwrap();

    tokio::time::sleep(Duration::from_secs(3600)).await;

    // Exactly one of the two outcomes happened, never both, never neither.
    let delivered = ctx.delivered.lock().unwrap().len();
    assert!(removed ^ (delivered == 1));
    assert!(ctx.store.get_all().await.unwrap().is_empty());
}
