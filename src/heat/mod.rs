pub mod contrib;
pub mod exec;
pub mod matrix;
pub mod normalize;
pub mod output;
pub mod palette;
pub mod parse;
pub mod rank;

pub use contrib::{ContributionMap, MonthSet};
pub use exec::{exec, load_history, History};
pub use matrix::{build_matrix, Matrix, MatrixOptions};
pub use output::{output_json, render_block, render_inline};
pub use palette::{BlockWidth, PaletteCycle, PaletteName};
pub use parse::{CommitFilter, CommitIndex};
pub use rank::{top_committers, top_committers_normalized};
