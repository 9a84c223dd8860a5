use std::sync::{Arc, Mutex};
use std::time::Duration;

use blogsub::bus::{Event, EventBus, MutationKind, Topic};
use blogsub::model::{Comment, Id, Post};
use blogsub::mutation::{CreateComment, CreatePost, CreateUser, Mutations, UpdatePost};
use blogsub::notify::NotificationEmitter;
use blogsub::persistence::{MemoryStore, SledStore, Store};

fn seed<S: Store>(m: &mut Mutations<S>) {
    m.create_user(CreateUser {
        id: Some(Id::from("u1")),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        age: Some(36),
    })
    .unwrap();
}

fn new_post(id: &str, published: bool) -> CreatePost {
    CreatePost {
        id: Some(Id::from(id)),
        title: format!("post {id}"),
        body: "body".to_string(),
        published,
        author: Id::from("u1"),
    }
}

#[tokio::test]
async fn subscriber_task_sees_committed_state() {
    let bus = EventBus::new();
    let (_handle, mut rx) = bus.subscribe_channel(Topic::post());
    let mutations = Arc::new(Mutex::new(Mutations::new(
        MemoryStore::new(),
        NotificationEmitter::new(bus.clone()),
    )));
    seed(&mut *mutations.lock().unwrap());

    let reader = mutations.clone();
    let listener = tokio::spawn(async move {
        let event = rx.recv().await.expect("bus closed");
        let post = event.as_post().expect("post event").clone();
        let stored: Post = reader.lock().unwrap().store().get(&post.id).unwrap().unwrap();
        (event.kind(), post, stored)
    });

    mutations
        .lock()
        .unwrap()
        .create_post(new_post("p1", true))
        .unwrap();

    let (kind, delivered, stored) = tokio::time::timeout(Duration::from_secs(5), listener)
        .await
        .expect("listener timed out")
        .unwrap();
    assert_eq!(kind, MutationKind::Created);
    assert_eq!(delivered, stored);
}

#[tokio::test]
async fn unsubscribed_listener_gets_nothing_more() {
    let bus = EventBus::new();
    let (handle, mut rx) = bus.subscribe_channel(Topic::post());
    let mut m = Mutations::new(MemoryStore::new(), NotificationEmitter::new(bus.clone()));
    seed(&mut m);

    m.create_post(new_post("p1", true)).unwrap();
    bus.unsubscribe(&handle);
    tokio::time::sleep(Duration::from_millis(5)).await;
    m.update_post(
        &Id::from("p1"),
        UpdatePost {
            title: Some("after".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(rx.recv().await.map(|e| e.kind()), Some(MutationKind::Created));
    // the sender side was dropped with the subscription
    assert!(rx.recv().await.is_none());
}

#[test]
fn sled_backend_drives_the_same_notifications() {
    let bus = EventBus::new();
    let (_hp, mut rx_post) = bus.subscribe_channel(Topic::post());
    let (_hc, mut rx_comment) = bus.subscribe_channel(Topic::comment(&Id::from("p1")));
    let mut m = Mutations::new(
        SledStore::temporary().unwrap(),
        NotificationEmitter::new(bus),
    );
    seed(&mut m);

    m.create_post(new_post("p1", true)).unwrap();
    for i in 0..4 {
        m.create_comment(CreateComment {
            id: None,
            text: format!("comment {i}"),
            author: Id::from("u1"),
            post: Id::from("p1"),
        })
        .unwrap();
    }
    m.delete_post(&Id::from("p1")).unwrap();

    let mut post_kinds = Vec::new();
    while let Ok(event) = rx_post.try_recv() {
        post_kinds.push(event.kind());
    }
    assert_eq!(post_kinds, vec![MutationKind::Created, MutationKind::Deleted]);

    let mut comment_events: Vec<Event> = Vec::new();
    while let Ok(event) = rx_comment.try_recv() {
        comment_events.push(event);
    }
    assert_eq!(comment_events.len(), 4);
    assert!(comment_events.iter().all(|e| e.kind() == MutationKind::Created));

    assert!(m.store().list::<Comment>().unwrap().is_empty());
}
