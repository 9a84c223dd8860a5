//! Mutation handlers
//!
//! Every handler runs the same sequence: validate, write to the store, then
//! hand the before/after snapshots to the [`NotificationEmitter`]. Validation
//! errors are returned before anything is written, and the notification is
//! published only after the write succeeded, so a subscriber that re-reads the
//! store on an event sees the committed state.
//!
//! `Mutations` takes `&mut self` for every write. Share it behind a lock
//! (for example `Arc<Mutex<Mutations<_>>>`) to serialise concurrent callers.

use tracing::{debug, info};

use crate::model::{Comment, Id, Post, User};
use crate::mutation::input::{
    CreateComment, CreatePost, CreateUser, UpdateComment, UpdatePost, UpdateUser,
};
use crate::notify::NotificationEmitter;
use crate::persistence::Store;
use crate::utils::error::MutationError;

#[derive(Debug)]
pub struct Mutations<S> {
    store: S,
    emitter: NotificationEmitter,
}

impl<S: Store> Mutations<S> {
    pub fn new(store: S, emitter: NotificationEmitter) -> Self {
        Self { store, emitter }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn emitter(&self) -> &NotificationEmitter {
        &self.emitter
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn create_user(&mut self, input: CreateUser) -> Result<User, MutationError> {
        if self.email_taken(&input.email, None)? {
            return Err(MutationError::EmailTaken);
        }

        let user = User {
            id: input.id.unwrap_or_default(),
            name: input.name,
            email: input.email,
            age: input.age,
        };
        self.store.insert(user.clone())?;

        info!(user = %user.id, "user created");
        Ok(user)
    }

    pub fn update_user(&mut self, id: &Id, input: UpdateUser) -> Result<User, MutationError> {
        let mut user: User = self.store.get(id)?.ok_or(MutationError::UserNotFound)?;

        if let Some(email) = input.email {
            if self.email_taken(&email, Some(id))? {
                return Err(MutationError::EmailTaken);
            }
            user.email = email;
        }
        if let Some(name) = input.name {
            user.name = name;
        }
        if input.age.is_some() {
            user.age = input.age;
        }
        self.store.replace(user.clone())?;

        info!(user = %user.id, "user updated");
        Ok(user)
    }

    /// Removes the user together with their posts, the comments under those
    /// posts, and the user's comments elsewhere.
    ///
    /// Published posts removed here notify like [`delete_post`](Self::delete_post).
    /// The user's comments on surviving posts each notify their post's
    /// comment topic. Every removal notifies as soon as it is committed and
    /// the user row goes last, so a store error partway through leaves the
    /// user in place and no removed record unannounced.
    pub fn delete_user(&mut self, id: &Id) -> Result<User, MutationError> {
        self.require_user(id)?;

        let posts: Vec<Post> = self
            .store
            .list::<Post>()?
            .into_iter()
            .filter(|p| &p.author == id)
            .collect();
        for post in &posts {
            let Some(post) = self.store.remove::<Post>(&post.id)? else {
                continue;
            };
            self.store.cascade_delete_comments(&post.id)?;
            self.emitter.post_deleted(&post);
        }

        // comments under the removed posts are already gone
        let comments: Vec<Comment> = self
            .store
            .list::<Comment>()?
            .into_iter()
            .filter(|c| &c.author == id)
            .collect();
        for comment in &comments {
            if let Some(comment) = self.store.remove::<Comment>(&comment.id)? {
                self.emitter.comment_deleted(&comment);
            }
        }

        let user: User = self
            .store
            .remove(id)?
            .ok_or(MutationError::UserNotFound)?;

        info!(
            user = %user.id,
            posts = posts.len(),
            comments = comments.len(),
            "user deleted"
        );
        Ok(user)
    }

    pub fn create_post(&mut self, input: CreatePost) -> Result<Post, MutationError> {
        self.require_user(&input.author)?;

        let post = Post {
            id: input.id.unwrap_or_default(),
            title: input.title,
            body: input.body,
            published: input.published,
            author: input.author,
        };
        self.store.insert(post.clone())?;
        self.emitter.post_created(&post);

        info!(post = %post.id, published = post.published, "post created");
        Ok(post)
    }

    pub fn update_post(&mut self, id: &Id, input: UpdatePost) -> Result<Post, MutationError> {
        let mut post: Post = self.store.get(id)?.ok_or(MutationError::PostNotFound)?;

        if let Some(title) = input.title {
            post.title = title;
        }
        if let Some(body) = input.body {
            post.body = body;
        }
        if let Some(published) = input.published {
            post.published = published;
        }
        let before = self.store.replace(post.clone())?;
        self.emitter.post_updated(&before, &post);

        info!(post = %post.id, published = post.published, "post updated");
        Ok(post)
    }

    /// Removes the post and its comments. Only the post itself notifies.
    pub fn delete_post(&mut self, id: &Id) -> Result<Post, MutationError> {
        let post: Post = self
            .store
            .remove(id)?
            .ok_or(MutationError::PostNotFound)?;
        let comments = self.store.cascade_delete_comments(&post.id)?;
        self.emitter.post_deleted(&post);

        debug!(post = %post.id, comments = comments.len(), "cascaded comment removal");
        info!(post = %post.id, "post deleted");
        Ok(post)
    }

    pub fn create_comment(&mut self, input: CreateComment) -> Result<Comment, MutationError> {
        self.require_user(&input.author)?;
        let post: Post = self
            .store
            .get(&input.post)?
            .ok_or(MutationError::PostNotFound)?;
        if !post.published {
            return Err(MutationError::PostNotPublished);
        }

        let comment = Comment {
            id: input.id.unwrap_or_default(),
            text: input.text,
            author: input.author,
            post: input.post,
        };
        self.store.insert(comment.clone())?;
        self.emitter.comment_created(&comment);

        info!(comment = %comment.id, post = %comment.post, "comment created");
        Ok(comment)
    }

    pub fn update_comment(
        &mut self,
        id: &Id,
        input: UpdateComment,
    ) -> Result<Comment, MutationError> {
        let mut comment: Comment = self
            .store
            .get(id)?
            .ok_or(MutationError::CommentNotFound)?;

        if let Some(text) = input.text {
            comment.text = text;
        }
        let before = self.store.replace(comment.clone())?;
        self.emitter.comment_updated(&before, &comment);

        info!(comment = %comment.id, "comment updated");
        Ok(comment)
    }

    pub fn delete_comment(&mut self, id: &Id) -> Result<Comment, MutationError> {
        let comment: Comment = self
            .store
            .remove(id)?
            .ok_or(MutationError::CommentNotFound)?;
        self.emitter.comment_deleted(&comment);

        info!(comment = %comment.id, "comment deleted");
        Ok(comment)
    }

    fn require_user(&self, id: &Id) -> Result<(), MutationError> {
        match self.store.get::<User>(id)? {
            Some(_) => Ok(()),
            None => Err(MutationError::UserNotFound),
        }
    }

    fn email_taken(&self, email: &str, except: Option<&Id>) -> Result<bool, MutationError> {
        Ok(self
            .store
            .list::<User>()?
            .iter()
            .any(|u| u.email == email && Some(&u.id) != except))
    }
}
