pub mod file;
pub mod stdin;

use serde_json::Value;

/// Document from `--input`, else piped stdin. `what` names the document in
/// the error when neither is available.
pub fn read_document(path: Option<&str>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return file::read_value(path);
    }
    match stdin::read_stdin()? {
        Some(value) => Ok(value),
        None => Err(format!("--input <file.json|file.yaml> or stdin required for {what}").into()),
    }
}
