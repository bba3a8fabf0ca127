//! 作业公告实体（公共记录）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub class_level: String,
    pub author_id: i64,
    pub instructor_id: i64,
    pub views: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::assignment_details::Entity")]
    Detail,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::assignment_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Detail.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 公告记录与详情记录合成业务模型
impl Model {
    pub fn into_assignment(
        self,
        detail: super::assignment_details::Model,
    ) -> crate::models::assignments::entities::Assignment {
        use chrono::{DateTime, Utc};

        use crate::models::assignments::entities::Assignment;

        Assignment {
            id: self.id,
            title: self.title,
            content: self.content,
            class_level: self.class_level,
            due_date: detail
                .due_date
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            max_submissions: detail.max_submissions,
            current_submissions: detail.current_submissions,
            has_password: detail.access_secret_hash.is_some(),
            author_id: self.author_id,
            instructor_id: self.instructor_id,
            views: self.views,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
