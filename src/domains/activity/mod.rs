pub mod prober;

pub use prober::{
    ActivityReport, CwdLookup, DEFAULT_AGENT_PROCESS_PATTERNS, ProcessActivityProber,
    ProcessEntry, parse_lsof_cwd, parse_process_table,
};
