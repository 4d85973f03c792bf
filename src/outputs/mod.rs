//! Output generation for the fetched batch.
//!
//! # Submodules
//!
//! - [`table`]: Writes the records as a CSV table, one row per news item
//! - [`json`]: Writes the whole batch, errors included, as JSON
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── fno_news_1_Week.csv
//! └── fno_news_1_Week.json
//! ```

pub mod json;
pub mod table;

use crate::timeframe::Timeframe;

/// Base file name (without extension) for a timeframe, e.g. `fno_news_3_Months`.
pub fn file_stem(timeframe: Timeframe) -> String {
    format!("fno_news_{}", timeframe.file_label())
}
