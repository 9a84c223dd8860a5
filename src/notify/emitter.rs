//! Notification emitter
//!
//! Turns a before/after pair of snapshots into at most one event and
//! publishes it on the right topic. Callers must have committed the mutation
//! to the store first and must have done their own validation; nothing here
//! checks existence or reports domain errors.
//!
//! Posts go to [`Topic::post`] and pass through [`visibility_transition`].
//! Comments have no visibility of their own and always notify on
//! [`Topic::comment`] of their parent post.

use serde::Deserialize;
use tracing::debug;

use crate::bus::{Event, EventBus, MutationKind, Topic};
use crate::model::{Comment, Post};
use crate::notify::visibility::visibility_transition;

/// Which snapshot an unpublish (visible -> hidden) `Deleted` event carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnpublishSnapshot {
    /// The post as it was before the update, still marked published.
    Before,
    /// The post as stored after the update, `published: false`.
    #[default]
    After,
}

#[derive(Debug, Clone)]
pub struct NotificationEmitter {
    bus: EventBus,
    unpublish_snapshot: UnpublishSnapshot,
}

impl NotificationEmitter {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            unpublish_snapshot: UnpublishSnapshot::default(),
        }
    }

    pub fn with_unpublish_snapshot(mut self, snapshot: UnpublishSnapshot) -> Self {
        self.unpublish_snapshot = snapshot;
        self
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Dispatches on the shape of the pair: `(None, Some)` is a create,
    /// `(Some, Some)` an update, `(Some, None)` a delete.
    ///
    /// # Panics
    ///
    /// Panics when both snapshots are `None`.
    pub fn post_changed(&self, before: Option<&Post>, after: Option<&Post>) -> Option<MutationKind> {
        match (before, after) {
            (None, Some(after)) => self.post_created(after),
            (Some(before), Some(after)) => self.post_updated(before, after),
            (Some(before), None) => self.post_deleted(before),
            (None, None) => panic!("post notification needs a before or an after snapshot"),
        }
    }

    /// A post born unpublished stays silent until it is published.
    pub fn post_created(&self, post: &Post) -> Option<MutationKind> {
        if !post.published {
            return None;
        }
        self.publish_post(MutationKind::Created, post)
    }

    pub fn post_updated(&self, before: &Post, after: &Post) -> Option<MutationKind> {
        debug_assert_eq!(before.id, after.id, "snapshots describe different posts");

        let kind = visibility_transition(
            before.published,
            after.published,
            before.content_differs(after),
        )?;
        let data = match (kind, self.unpublish_snapshot) {
            (MutationKind::Deleted, UnpublishSnapshot::Before) => before,
            _ => after,
        };
        self.publish_post(kind, data)
    }

    /// Deleting a hidden post emits nothing. Comments removed along with the
    /// post are covered by this single event.
    pub fn post_deleted(&self, post: &Post) -> Option<MutationKind> {
        if !post.published {
            return None;
        }
        self.publish_post(MutationKind::Deleted, post)
    }

    /// Comment counterpart of [`post_changed`](Self::post_changed).
    ///
    /// # Panics
    ///
    /// Panics when both snapshots are `None`.
    pub fn comment_changed(
        &self,
        before: Option<&Comment>,
        after: Option<&Comment>,
    ) -> Option<MutationKind> {
        match (before, after) {
            (None, Some(after)) => self.comment_created(after),
            (Some(before), Some(after)) => self.comment_updated(before, after),
            (Some(before), None) => self.comment_deleted(before),
            (None, None) => panic!("comment notification needs a before or an after snapshot"),
        }
    }

    pub fn comment_created(&self, comment: &Comment) -> Option<MutationKind> {
        self.publish_comment(MutationKind::Created, comment)
    }

    /// Always notifies, even when the text did not change.
    pub fn comment_updated(&self, before: &Comment, after: &Comment) -> Option<MutationKind> {
        debug_assert_eq!(before.id, after.id, "snapshots describe different comments");
        debug_assert_eq!(before.post, after.post, "comment moved between posts");
        self.publish_comment(MutationKind::Updated, after)
    }

    pub fn comment_deleted(&self, comment: &Comment) -> Option<MutationKind> {
        self.publish_comment(MutationKind::Deleted, comment)
    }

    fn publish_post(&self, kind: MutationKind, post: &Post) -> Option<MutationKind> {
        let topic = Topic::post();
        let delivered = self.bus.publish(&topic, Event::post(kind, post.clone()));
        debug!(%topic, ?kind, post = %post.id, delivered, "post notification");
        Some(kind)
    }

    fn publish_comment(&self, kind: MutationKind, comment: &Comment) -> Option<MutationKind> {
        let topic = Topic::comment(&comment.post);
        let delivered = self
            .bus
            .publish(&topic, Event::comment(kind, comment.clone()));
        debug!(%topic, ?kind, comment = %comment.id, delivered, "comment notification");
        Some(kind)
    }
}
