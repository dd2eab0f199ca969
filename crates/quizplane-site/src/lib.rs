//! quizplane-site: episode discovery, the quiz data module, and static page
//! generation.

pub mod discover;
pub mod page;
pub mod template;

pub use discover::{
    build_inputs, get_quizzes_details, list_quizzes, load_meta, write_data_module, QuizSummary,
    DEFAULT_EPISODE_PREFIX,
};
pub use page::{generate_pages, render_page, GeneratedPage};
pub use template::{render_template, Template};
