pub mod detail;

pub use detail::{draw_detail, fit_commit_line, DetailView};
