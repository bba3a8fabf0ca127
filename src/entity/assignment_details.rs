//! 作业详情实体
//!
//! 与公告记录一一对应，同一事务内创建和删除。
//! `current_submissions` 只允许经由带条件的原子自增变更。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub post_id: i64,
    pub due_date: Option<i64>,
    pub max_submissions: i64,
    pub current_submissions: i64,
    #[sea_orm(column_type = "Text", nullable)]
    pub access_secret_hash: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment_posts::Entity",
        from = "Column::PostId",
        to = "super::assignment_posts::Column::Id"
    )]
    Post,
}

impl Related<super::assignment_posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
