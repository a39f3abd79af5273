pub mod classifier_repository_postgres;
pub mod sea_orm_entity;
pub mod title_repository_postgres;
