//! Visibility transitions
//!
//! Subscribers only ever see published posts, so a change of the
//! `published` flag looks to them like the post appearing or disappearing.
//!
//! | before | after | event |
//! |---|---|---|
//! | hidden  | hidden  | none |
//! | hidden  | visible | `Created` |
//! | visible | hidden  | `Deleted` |
//! | visible | visible | `Updated` if other content changed, else none |
//!
//! The visibility rows win over the content check: a post that becomes
//! visible and is retitled in the same mutation yields only `Created`.

use crate::bus::MutationKind;

pub fn visibility_transition(
    before_published: bool,
    after_published: bool,
    content_changed: bool,
) -> Option<MutationKind> {
    match (before_published, after_published) {
        (false, false) => None,
        (false, true) => Some(MutationKind::Created),
        (true, false) => Some(MutationKind::Deleted),
        (true, true) if content_changed => Some(MutationKind::Updated),
        (true, true) => None,
    }
}
