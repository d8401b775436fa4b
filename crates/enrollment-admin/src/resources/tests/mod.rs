mod client;
mod common;
mod pagination;
