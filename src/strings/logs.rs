//! Progress lines reported by tool actions and the run loop.

pub fn should_run(name: &str, arguments: &str) -> String {
    format!("Should Run: {name}: {arguments}")
}

pub fn executing(command: &str) -> String {
    format!("Executing: {command}")
}

pub fn executing_git(command_line: &str) -> String {
    format!("Executing Git command: {command_line}")
}

pub fn writing_file(path: &str) -> String {
    format!("Writing file: '{path}'")
}

pub fn write_failed(path: &str) -> String {
    format!("Write failed: '{path}'")
}

pub fn reading_file(path: &str) -> String {
    format!("Reading file: '{path}'")
}

pub fn listing_dir(path: &str, listing: &[String]) -> String {
    format!("Getting file list: '{path}' -> {listing:?}")
}

pub fn read_failed(path: &str) -> String {
    format!("Read failed: '{path}'")
}
