use sea_orm::entity::prelude::*;
use uuid::Uuid;

/// Join rows between genres and titles. Either side is nulled on delete;
/// orphaned rows are tolerated and never cleaned up.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "genre_titles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub genre_id: Option<Uuid>,
    pub title_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
