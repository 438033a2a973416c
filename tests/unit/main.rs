//! Unit tests for the internal-call helper and probe loop

mod probe_run;
