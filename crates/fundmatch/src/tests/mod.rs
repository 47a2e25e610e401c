mod common;
mod engine;
mod properties;
mod scoring;
