pub mod recording;
pub mod schemas;
