#[derive(Default, Eq, PartialEq, Debug, Clone)]
pub struct DocumentStatus {
    pub file_name: String,
    pub open_tasks: usize,
    pub completed_tasks: usize,
}

impl DocumentStatus {
    pub fn counts_to_string(&self) -> String {
        format!("{} open · {} done", self.open_tasks, self.completed_tasks)
    }
}
