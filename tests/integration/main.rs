mod cli_test;
mod common;
mod search_test;
