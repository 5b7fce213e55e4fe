pub mod repl;

pub use repl::{
    classify_input, load_model, report_loaded_model, run_chat_loop, run_repl_mode, InputAction, LineReader,
    ReadOutcome,
};
