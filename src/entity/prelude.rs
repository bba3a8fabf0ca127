//! 预导入模块，方便使用

pub use super::assignment_details::{
    ActiveModel as AssignmentDetailActiveModel, Entity as AssignmentDetails,
    Model as AssignmentDetailModel,
};
pub use super::assignment_posts::{
    ActiveModel as AssignmentPostActiveModel, Entity as AssignmentPosts,
    Model as AssignmentPostModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
