pub mod reader;

pub use reader::{SpreadsheetReader, WorkbookTables};
