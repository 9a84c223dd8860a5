use serde::Deserialize;

use crate::model::Id;
use crate::mutation::{CreateComment, CreatePost, CreateUser, UpdateComment, UpdatePost, UpdateUser};

/// One line of a mutation script.
///
/// ```json
/// {"type": "createPost", "data": {"id": "p1", "title": "A", "body": "", "published": false, "author": "u1"}}
/// {"type": "updatePost", "id": "p1", "data": {"published": true}}
/// {"type": "deletePost", "id": "p1"}
/// ```
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScriptCommand {
    CreateUser { data: CreateUser },
    UpdateUser { id: Id, data: UpdateUser },
    DeleteUser { id: Id },
    CreatePost { data: CreatePost },
    UpdatePost { id: Id, data: UpdatePost },
    DeletePost { id: Id },
    CreateComment { data: CreateComment },
    UpdateComment { id: Id, data: UpdateComment },
    DeleteComment { id: Id },
}

impl ScriptCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateUser { .. } => "createUser",
            Self::UpdateUser { .. } => "updateUser",
            Self::DeleteUser { .. } => "deleteUser",
            Self::CreatePost { .. } => "createPost",
            Self::UpdatePost { .. } => "updatePost",
            Self::DeletePost { .. } => "deletePost",
            Self::CreateComment { .. } => "createComment",
            Self::UpdateComment { .. } => "updateComment",
            Self::DeleteComment { .. } => "deleteComment",
        }
    }
}
