use serde::{Deserialize, Serialize};

use super::response::{
    CommentResponse, GroupResponse, PostResponse, ProfileResponse,
};
use crate::pagination::PageMeta;

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper<T> {
    pub user: T,
}

impl<T> UserWrapper<T> {
    pub fn wrap_with_user_data(user: T) -> UserWrapper<T> {
        UserWrapper { user }
    }
}

#[derive(Debug, Serialize)]
pub struct PostListWrapper {
    pub posts: Vec<PostResponse>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct GroupPostsWrapper {
    pub group: GroupResponse,
    pub posts: Vec<PostResponse>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct ProfileWrapper {
    pub profile: ProfileResponse,
    pub posts: Vec<PostResponse>,
    pub pagination: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct PostDetailWrapper {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}
