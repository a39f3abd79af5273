pub mod categories;
pub mod genres;
pub mod titles;

pub use categories::{
    create_category_handler, delete_category_handler, list_categories_handler, ClassifierRequest,
    ClassifierResponse,
};
pub use genres::{create_genre_handler, delete_genre_handler, list_genres_handler};
pub use titles::{
    create_title_handler, delete_title_handler, get_title_handler, list_titles_handler,
    update_title_handler, CreateTitleRequest, TitleResponse, UpdateTitleRequest,
};
