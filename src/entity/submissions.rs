//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: Option<i64>,
    pub student_name: String,
    #[sea_orm(column_type = "Text")]
    pub file_url: String,
    pub file_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,
    pub submitted_at: i64,
    pub is_checked: bool,
    pub checked_by: Option<i64>,
    pub checked_at: Option<i64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment_posts::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment_posts::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignment_posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::Submission;
        use chrono::{DateTime, Utc};

        Submission {
            id: self.id,
            assignment_id: self.assignment_id,
            student_id: self.student_id,
            student_name: self.student_name,
            file_url: self.file_url,
            file_name: self.file_name,
            comment: self.comment,
            submitted_at: DateTime::<Utc>::from_timestamp(self.submitted_at, 0)
                .unwrap_or_default(),
            is_checked: self.is_checked,
            checked_by: self.checked_by,
            checked_at: self
                .checked_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            feedback: self.feedback,
        }
    }
}
