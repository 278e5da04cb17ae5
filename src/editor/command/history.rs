/// Raw command lines in submission order. A line identical to the one right
/// before it is not recorded again.
#[derive(Debug, Default, Clone)]
pub struct CommandHistory {
    entries: Vec<String>,
}

impl CommandHistory {
    /// Returns `false` when `cmd` repeats the previous entry.
    pub fn push(&mut self, cmd: &str) -> bool {
        if self.last() == Some(cmd) {
            return false;
        }
        self.entries.push(cmd.to_string());
        true
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
