mod arrays;
mod parse_bad;
mod paths;
