use serde::{Deserialize, Serialize};

use super::FormCheck;
use crate::errors::RequestError;

const MIN_PASSWORD_LENGTH: usize = 8;

// ----------------- Identity Requests -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl SignupRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        FormCheck::new()
            .require("username", &self.username)
            .check(
                "username",
                self.username
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-'),
                "may only contain letters, digits, '_' and '-'",
            )
            .require("email", &self.email)
            .check("email", self.email.contains('@'), "is not a valid address")
            .check(
                "password",
                self.password.len() >= MIN_PASSWORD_LENGTH,
                "must be at least 8 characters",
            )
            .finish()
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        FormCheck::new()
            .require("username", &self.username)
            .require("password", &self.password)
            .finish()
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        FormCheck::new()
            .require("old_password", &self.old_password)
            .check(
                "new_password",
                self.new_password.len() >= MIN_PASSWORD_LENGTH,
                "must be at least 8 characters",
            )
            .finish()
    }
}

// ----------------- Post Requests -----------------

/// Shared by post creation and post editing; `pub_date` and `author` are
/// server-assigned and never accepted from the client.
#[derive(Deserialize, Serialize, Debug)]
pub struct PostForm {
    pub text: String,
    #[serde(default)]
    pub group: Option<i64>,
    #[serde(default)]
    pub image: Option<ImageUpload>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ImageUpload {
    pub filename: String,
    /// Base64-encoded file body.
    pub data: String,
}

impl PostForm {
    pub fn validate(&self) -> Result<(), RequestError> {
        let mut check = FormCheck::new().require("text", &self.text);
        if let Some(image) = &self.image {
            check = check
                .require("image.filename", &image.filename)
                .require("image.data", &image.data);
        }
        check.finish()
    }
}

/// Edit form: only `text` and `group` are editable, and the image cannot be
/// replaced after creation. Unknown fields (an `image` in particular) are a
/// deserialization error rather than being silently dropped.
#[derive(Deserialize, Serialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct PostEditForm {
    pub text: String,
    #[serde(default)]
    pub group: Option<i64>,
}

impl PostEditForm {
    pub fn validate(&self) -> Result<(), RequestError> {
        FormCheck::new().require("text", &self.text).finish()
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentForm {
    pub text: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<(), RequestError> {
        FormCheck::new().require("text", &self.text).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_form_rejects_blank_text() {
        let form = PostForm {
            text: "   ".to_string(),
            group: None,
            image: None,
        };
        assert!(matches!(
            form.validate(),
            Err(RequestError::Validation(errors)) if errors[0].starts_with("text:")
        ));
    }

    #[test]
    fn post_form_accepts_text_only() {
        let form = PostForm {
            text: "hello".to_string(),
            group: None,
            image: None,
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn edit_form_rejects_an_image_field() {
        let result = serde_json::from_value::<PostEditForm>(serde_json::json!({
            "text": "updated",
            "image": { "filename": "cat.png", "data": "aGk=" },
        }));
        assert!(result.is_err());
    }

    #[test]
    fn signup_collects_every_failure() {
        let request = SignupRequest {
            username: "".to_string(),
            email: "not-an-address".to_string(),
            password: "short".to_string(),
            first_name: None,
            last_name: None,
        };
        match request.validate() {
            Err(RequestError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected a validation failure, got {:?}", other),
        }
    }
}
