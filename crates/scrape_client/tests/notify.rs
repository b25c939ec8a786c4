use std::time::Duration;

use scrape_client::Notifications;
use scrape_core::NotificationKind;

fn messages(notifications: &Notifications) -> Vec<String> {
    notifications.list().into_iter().map(|n| n.message).collect()
}

#[tokio::test(start_paused = true)]
async fn notifications_expire_after_default_duration() {
    let notifications = Notifications::new();
    let id = notifications.success("Saved", None);

    let shown = notifications.list();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].id, id);
    assert_eq!(shown[0].kind, NotificationKind::Success);

    tokio::time::sleep(Duration::from_millis(2999)).await;
    assert_eq!(notifications.list().len(), 1);
    tokio::time::sleep(Duration::from_millis(2)).await;
    assert!(notifications.list().is_empty());
}

#[tokio::test(start_paused = true)]
async fn zero_duration_keeps_notification() {
    let notifications = Notifications::new();
    notifications.error("Sticky", Some(Duration::ZERO));
    notifications.info("Short", Some(Duration::from_millis(500)));

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(messages(&notifications), vec!["Sticky".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn ids_increase_and_order_is_kept() {
    let notifications = Notifications::new();
    let first = notifications.info("one", None);
    let second = notifications.warning("two", None);
    let third = notifications.error("three", None);

    assert!(first < second && second < third);
    assert_eq!(
        messages(&notifications),
        vec!["one".to_string(), "two".to_string(), "three".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn manual_removal_before_timer_is_harmless() {
    let notifications = Notifications::new();
    let id = notifications.success("done", None);
    let kept = notifications.info("kept", Some(Duration::ZERO));

    notifications.remove(id);
    notifications.remove(id);
    assert_eq!(messages(&notifications), vec!["kept".to_string()]);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(notifications.list()[0].id, kept);

    notifications.clear();
    assert!(notifications.list().is_empty());
}

#[test]
fn notifications_outside_a_runtime_do_not_expire() {
    scrape_logging::initialize_for_tests();
    let notifications = Notifications::new();
    notifications.info("no runtime", None);
    assert_eq!(notifications.list().len(), 1);
}
