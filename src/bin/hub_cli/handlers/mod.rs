#![deny(clippy::all, clippy::pedantic)]

pub mod categories;
pub mod forms;
pub mod pages;
pub mod posts;
