pub mod options;
pub mod parser;
pub mod session;

pub use options::UciOptions;
pub use parser::{parse_uci_command, GoParams, UciCommand};
pub use session::{process_uci_line, run_uci_loop, stdout_sink, OutputSink, UciEngine};
