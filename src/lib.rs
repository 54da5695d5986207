pub mod cli;
pub mod fetch;
pub mod parser;
pub mod writer;

pub fn get_version() -> String {
    "0.1.0".to_string()
}
