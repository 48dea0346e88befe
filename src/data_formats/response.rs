use serde::{Deserialize, Serialize};

use crate::models::{Comment, Group, Post, User};

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub token: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ProfileResponse {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Whether the viewing user follows this profile; false for anonymous
    /// viewers and for the profile owner themselves.
    pub following: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GroupResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PostGroupRef {
    pub id: i64,
    pub title: String,
    pub slug: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub pub_date: String,
    pub author: String,
    pub group: Option<PostGroupRef>,
    pub image: Option<String>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub created: String,
    pub author: String,
}

impl UserResponse {
    pub fn new(
        User {
            username,
            email,
            first_name,
            last_name,
            ..
        }: User,
        token: String,
    ) -> Self {
        UserResponse {
            username,
            email,
            first_name,
            last_name,
            token,
        }
    }
}

impl ProfileResponse {
    pub fn new(
        User {
            username,
            first_name,
            last_name,
            ..
        }: User,
        following: bool,
    ) -> Self {
        ProfileResponse {
            username,
            first_name,
            last_name,
            following,
        }
    }
}

impl GroupResponse {
    pub fn new(
        Group {
            id,
            title,
            slug,
            description,
        }: Group,
    ) -> Self {
        GroupResponse {
            id,
            title,
            slug,
            description,
        }
    }
}

impl PostResponse {
    pub fn new(post: Post) -> Self {
        let group = match (post.group_id, post.group_slug, post.group_title) {
            (Some(id), Some(slug), Some(title)) => Some(PostGroupRef { id, title, slug }),
            _ => None,
        };
        PostResponse {
            id: post.id,
            text: post.text,
            pub_date: post.pub_date.to_string(),
            author: post.author_username,
            group,
            image: post.image,
        }
    }
}

impl CommentResponse {
    pub fn new(
        Comment {
            id,
            text,
            created,
            author_username,
            ..
        }: Comment,
    ) -> Self {
        CommentResponse {
            id,
            text,
            created: created.to_string(),
            author: author_username,
        }
    }
}
