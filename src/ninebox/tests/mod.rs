mod common;

mod rating;
mod scoring;
