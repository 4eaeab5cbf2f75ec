//! Console messages printed by the command handlers.

pub const NO_ASSISTANT_SELECTED: &str = "No assistant selected";
pub const CHAT_PROMPT: &str = "chat: ";
pub const WORKING: &str = "Working...";
pub const NO_RESPONSE: &str = "(no response)";
pub const NO_THREADS: &str = "No known threads. Create one with `thread create`.";
pub const NO_ASSISTANTS: &str = "No assistants.";

pub fn now_selected(id: &str) -> String {
    format!("{id} is now selected.")
}

pub fn created_assistant(name: &str, id: &str) -> String {
    format!("Created: Name = {name}, ID = {id}")
}

pub fn deleting_assistant(id: &str) -> String {
    format!("Deleting assistant {id}.")
}

pub fn unknown_assistant_name(name: &str) -> String {
    format!("Unknown name: '{name}'")
}

pub fn thread_created(id: &str, selected: bool) -> String {
    if selected {
        format!("Thread {id} created and selected.")
    } else {
        format!("Thread {id} created.")
    }
}

pub fn thread_deleted(id: &str) -> String {
    format!("Thread {id} deleted.")
}

pub fn using_thread(id: &str) -> String {
    format!("Using thread {id}.")
}

pub fn assistant_header(assistant_id: Option<&str>) -> String {
    format!("Assistant {}", assistant_id.unwrap_or(""))
}
