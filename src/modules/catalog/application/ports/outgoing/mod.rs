pub mod classifier_repository;
pub mod title_repository;

pub use classifier_repository::{ClassifierRepository, ClassifierRepositoryError, NewClassifier};
pub use title_repository::{
    NewTitle, TitleFilter, TitlePatch, TitleRepository, TitleRepositoryError,
};
