mod parse_good;
mod utils;
