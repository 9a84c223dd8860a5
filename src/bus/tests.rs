use std::sync::mpsc as std_mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::{Event, EventBus, FnSink, MutationKind, ResourceKind, Topic};
use crate::model::{Comment, Id, Post};
use crate::utils::error::SinkError;

fn sample_post() -> Post {
    Post {
        id: Id::from("p1"),
        title: "hello".to_string(),
        body: "world".to_string(),
        published: true,
        author: Id::from("u1"),
    }
}

fn sample_event() -> Event {
    Event::post(MutationKind::Created, sample_post())
}

const WAIT: Duration = Duration::from_secs(2);

/// Reports every delivery on `tx`. Callback sinks run on their own worker,
/// so tests wait on the receiving end instead of checking right after
/// `publish`.
fn signalling_sink(tx: std_mpsc::Sender<Event>) -> FnSink<impl Fn(&Event) -> Result<(), SinkError>> {
    FnSink::new(move |event| {
        let _ = tx.send(event.clone());
        Ok(())
    })
}

#[test]
fn test_topic_names() {
    assert_eq!(Topic::post().as_str(), "post");
    assert_eq!(Topic::comment(&Id::from(42u64)).as_str(), "comment:42");
}

#[test]
fn test_topic_parse() {
    assert_eq!("post".parse::<Topic>().unwrap(), Topic::post());
    assert_eq!(
        "comment:abc".parse::<Topic>().unwrap(),
        Topic::comment(&Id::from("abc"))
    );
    assert!("comment:".parse::<Topic>().is_err());
    assert!("comments".parse::<Topic>().is_err());
    assert!("comment 42".parse::<Topic>().is_err());
}

#[test]
fn test_event_wire_shape() {
    let json = serde_json::to_value(sample_event()).unwrap();
    assert_eq!(json["post"]["mutation"], "CREATED");
    assert_eq!(json["post"]["data"]["title"], "hello");
    assert_eq!(json["post"]["data"]["published"], true);

    let comment = Event::comment(
        MutationKind::Deleted,
        Comment {
            id: Id::from("c1"),
            text: "hi".to_string(),
            author: Id::from("u1"),
            post: Id::from("p1"),
        },
    );
    let json = serde_json::to_value(&comment).unwrap();
    assert_eq!(json["comment"]["mutation"], "DELETED");
    assert_eq!(json["comment"]["data"]["post"], "p1");
}

#[test]
fn test_event_accessors() {
    let event = sample_event();
    assert_eq!(event.kind(), MutationKind::Created);
    assert_eq!(event.resource(), ResourceKind::Post);
    assert_eq!(event.as_post().unwrap().id, Id::from("p1"));
    assert!(event.as_comment().is_none());
}

#[test]
fn test_publish_without_subscribers_is_dropped() {
    let bus = EventBus::new();
    assert_eq!(bus.publish(&Topic::post(), sample_event()), 0);
    assert_eq!(bus.topic_count(), 0);
}

#[test]
fn test_subscribe_and_publish_channel() {
    let bus = EventBus::new();
    let (_handle, mut rx) = bus.subscribe_channel(Topic::post());

    assert_eq!(bus.publish(&Topic::post(), sample_event()), 1);

    let received = rx.try_recv().unwrap();
    assert_eq!(received, sample_event());
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_publish_only_reaches_matching_topic() {
    let bus = EventBus::new();
    let (_a, mut rx_42) = bus.subscribe_channel(Topic::comment(&Id::from(42u64)));
    let (_b, mut rx_43) = bus.subscribe_channel(Topic::comment(&Id::from(43u64)));

    bus.publish(&Topic::comment(&Id::from(42u64)), sample_event());

    assert!(rx_42.try_recv().is_ok());
    assert!(rx_43.try_recv().is_err());
}

#[test]
fn test_no_history_for_late_subscriber() {
    let bus = EventBus::new();
    let (_early, _rx_early) = bus.subscribe_channel(Topic::post());
    bus.publish(&Topic::post(), sample_event());

    let (_late, mut rx_late) = bus.subscribe_channel(Topic::post());
    assert!(rx_late.try_recv().is_err());
}

#[test]
fn test_unsubscribe_stops_delivery_and_is_idempotent() {
    let bus = EventBus::new();
    let (handle, mut rx) = bus.subscribe_channel(Topic::post());

    assert!(bus.unsubscribe(&handle));
    assert!(!bus.unsubscribe(&handle));

    assert_eq!(bus.publish(&Topic::post(), sample_event()), 0);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_empty_topic_is_collected() {
    let bus = EventBus::new();
    let (handle, _rx) = bus.subscribe_channel(Topic::post());
    assert_eq!(bus.topic_count(), 1);

    bus.unsubscribe(&handle);
    assert_eq!(bus.topic_count(), 0);
    assert_eq!(bus.subscriber_count(&Topic::post()), 0);
}

#[test]
fn test_failing_sink_does_not_block_others() {
    let bus = EventBus::new();
    let (tx, rx) = std_mpsc::channel();

    bus.subscribe(
        Topic::post(),
        FnSink::new(|_| Err(SinkError::Rejected("boom".to_string()))),
    );
    bus.subscribe(Topic::post(), signalling_sink(tx));

    assert_eq!(bus.publish(&Topic::post(), sample_event()), 2);
    assert_eq!(rx.recv_timeout(WAIT).unwrap(), sample_event());
    // a rejecting sink stays subscribed
    assert_eq!(bus.subscriber_count(&Topic::post()), 2);
}

#[test]
fn test_panicking_sink_is_isolated() {
    let bus = EventBus::new();
    let (tx, rx) = std_mpsc::channel();

    bus.subscribe(Topic::post(), FnSink::new(|_| panic!("sink exploded")));
    bus.subscribe(Topic::post(), signalling_sink(tx));

    bus.publish(&Topic::post(), sample_event());
    bus.publish(&Topic::post(), sample_event());

    rx.recv_timeout(WAIT).unwrap();
    rx.recv_timeout(WAIT).unwrap();
    // the worker survives the panic and keeps the subscription
    assert_eq!(bus.subscriber_count(&Topic::post()), 2);
}

#[test]
fn test_slow_sink_does_not_hold_up_others() {
    let bus = EventBus::new();
    let (done_tx, done_rx) = std_mpsc::channel();
    bus.subscribe(
        Topic::post(),
        FnSink::new(move |_| {
            thread::sleep(Duration::from_millis(500));
            let _ = done_tx.send(());
            Ok(())
        }),
    );
    let (_fast, mut rx) = bus.subscribe_channel(Topic::post());

    let publisher = bus.clone();
    let started = Instant::now();
    let delivered = thread::spawn(move || publisher.publish(&Topic::post(), sample_event()))
        .join()
        .unwrap();

    assert!(started.elapsed() < Duration::from_millis(250));
    assert_eq!(delivered, 2);
    // the fast subscriber has the event while the slow one is still busy
    assert_eq!(rx.try_recv().unwrap(), sample_event());
    assert!(done_rx.try_recv().is_err());
    done_rx.recv_timeout(WAIT).unwrap();
}

#[test]
fn test_callback_sink_sees_events_in_publish_order() {
    let bus = EventBus::new();
    let (tx, rx) = std_mpsc::channel();
    bus.subscribe(Topic::post(), signalling_sink(tx));

    let kinds = [MutationKind::Created, MutationKind::Updated, MutationKind::Deleted];
    for kind in kinds {
        bus.publish(&Topic::post(), Event::post(kind, sample_post()));
    }

    let seen: Vec<_> = (0..kinds.len())
        .map(|_| rx.recv_timeout(WAIT).unwrap().kind())
        .collect();
    assert_eq!(seen, kinds);
}

#[test]
fn test_unsubscribed_callback_gets_nothing() {
    let bus = EventBus::new();
    let (tx, rx) = std_mpsc::channel();
    let handle = bus.subscribe(Topic::post(), signalling_sink(tx));

    assert!(bus.unsubscribe(&handle));
    assert_eq!(bus.publish(&Topic::post(), sample_event()), 0);
    // the worker exits with the subscription and drops the sender
    assert!(matches!(
        rx.recv_timeout(WAIT),
        Err(std_mpsc::RecvTimeoutError::Disconnected)
    ));
}

#[test]
fn test_callback_reporting_closed_is_pruned() {
    let bus = EventBus::new();
    let (tx, rx) = std_mpsc::channel();
    bus.subscribe(
        Topic::post(),
        FnSink::new(move |_| {
            let _ = tx.send(());
            Err(SinkError::Closed)
        }),
    );

    bus.publish(&Topic::post(), sample_event());
    rx.recv_timeout(WAIT).unwrap();

    let deadline = Instant::now() + WAIT;
    while bus.subscriber_count(&Topic::post()) > 0 {
        assert!(Instant::now() < deadline, "closed sink was never pruned");
        bus.publish(&Topic::post(), sample_event());
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_closed_channel_is_pruned() {
    let bus = EventBus::new();
    let (_handle, rx) = bus.subscribe_channel(Topic::post());
    let (_other, mut rx_other) = bus.subscribe_channel(Topic::post());

    drop(rx);

    assert_eq!(bus.publish(&Topic::post(), sample_event()), 1);
    assert!(rx_other.try_recv().is_ok());
    assert_eq!(bus.subscriber_count(&Topic::post()), 1);
}

#[test]
fn test_sink_may_unsubscribe_during_fanout() {
    let bus = EventBus::new();
    let (handle, _rx) = bus.subscribe_channel(Topic::post());

    let inner_bus = bus.clone();
    let (tx, rx) = std_mpsc::channel();
    bus.subscribe(
        Topic::post(),
        FnSink::new(move |_| {
            inner_bus.unsubscribe(&handle);
            let _ = tx.send(());
            Ok(())
        }),
    );

    bus.publish(&Topic::post(), sample_event());
    rx.recv_timeout(WAIT).unwrap();
    assert_eq!(bus.subscriber_count(&Topic::post()), 1);
}

#[tokio::test]
async fn test_concurrent_subscribe_and_publish() {
    let bus = EventBus::new();
    let (_handle, mut rx) = bus.subscribe_channel(Topic::post());

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let bus = bus.clone();
        tasks.push(tokio::spawn(async move {
            let (handle, _rx) = bus.subscribe_channel(Topic::post());
            bus.publish(&Topic::post(), sample_event());
            bus.unsubscribe(&handle);
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let mut received = 0;
    while rx.try_recv().is_ok() {
        received += 1;
    }
    assert_eq!(received, 8);
    assert_eq!(bus.subscriber_count(&Topic::post()), 1);
}
