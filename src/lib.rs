//! Merge the movie text and numbers workbooks into one enriched dataset.

pub mod clean;
pub mod merge;
pub mod movies;
pub mod pipeline;
pub mod report;
pub mod workbook;
