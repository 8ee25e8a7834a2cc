use std::path::PathBuf;

use crate::compare::CompareOutput;

#[derive(Debug, Clone)]
pub struct CompareRequest {
    pub generation: u64,
    pub old_path: PathBuf,
    pub new_path: PathBuf,
    pub max_cells: Option<usize>,
}

#[derive(Debug)]
pub struct CompareResult {
    pub generation: u64,
    pub output: Result<CompareOutput, String>,
}
