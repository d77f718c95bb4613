mod common;
mod item;
