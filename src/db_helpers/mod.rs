mod comment_helpers;
mod follow_helpers;
mod group_helpers;
mod post_helpers;
mod user_helpers;

pub use comment_helpers::*;
pub use follow_helpers::*;
pub use group_helpers::*;
pub use post_helpers::*;
pub use user_helpers::*;
