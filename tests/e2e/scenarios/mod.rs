mod fixtures_and_helpers;
mod happy_path;
mod read_only;
