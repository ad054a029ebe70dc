pub mod dictionaries;
pub mod keywords;
pub mod pipeline;
pub mod prefilter;
pub mod profile;
pub mod ranking;
pub mod scoring;
pub mod weights;
